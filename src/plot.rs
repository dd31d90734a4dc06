//! Diagnostic overlay plot, one SVG per log.
//!
//! One panel per block with the standardised actor (black) and participant
//! (red) curves and the block's `z(r)` in the panel title.  The plot is only
//! for visual QC; nothing reads it back.
use std::error::Error;
use std::path::Path;

use anyhow::{anyhow, Result};
use ndarray::Array1;
use plotters::prelude::*;

/// Points drawn per curve; longer curves are decimated.
const MAX_POINTS: usize = 2000;

/// Standardised curves of one block, as scored.
#[derive(Debug, Clone)]
pub struct BlockTrace {
    pub label:         String,
    pub subject:       Array1<f64>,
    pub gold:          Array1<f64>,
    pub correlation_z: f64,
}

fn decimate(values: &Array1<f64>) -> Vec<(f64, f64)> {
    let step = values.len().div_ceil(MAX_POINTS).max(1);
    values
        .iter()
        .enumerate()
        .step_by(step)
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

fn draw(path: &Path, title: &str, traces: &[BlockTrace]) -> std::result::Result<(), Box<dyn Error>> {
    let width = 320 * traces.len() as u32;
    let root = SVGBackend::new(path, (width, 300)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 12))?;
    let panels = root.split_evenly((1, traces.len()));
    let last = traces.len() - 1;

    for (i, (panel, trace)) in panels.iter().zip(traces).enumerate() {
        let n = trace.subject.len().max(trace.gold.len()).max(2);
        let mut chart = ChartBuilder::on(panel)
            .caption(format!("{}: z(r) = {:.4}", trace.label, trace.correlation_z), ("sans-serif", 11))
            .margin(6)
            .x_label_area_size(22)
            .y_label_area_size(if i == 0 { 40 } else { 24 })
            .build_cartesian_2d(0f64..(n - 1) as f64, -3f64..3f64)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .x_desc("TR")
            .y_desc(if i == 0 { "Rating (z)" } else { "" })
            .draw()?;

        chart
            .draw_series(LineSeries::new(decimate(&trace.gold), BLACK.stroke_width(2)))?
            .label("Actor")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLACK.stroke_width(2)));
        chart
            .draw_series(LineSeries::new(decimate(&trace.subject), RED.stroke_width(2)))?
            .label("Participant")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED.stroke_width(2)));

        if i == last {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(WHITE)
                .draw()?;
        }
    }

    root.present()?;
    Ok(())
}

/// Write the overlay plot for one log.  A log without blocks writes nothing.
pub fn plot_log(path: &Path, title: &str, traces: &[BlockTrace]) -> Result<()> {
    if traces.is_empty() {
        return Ok(());
    }
    draw(path, title, traces).map_err(|e| anyhow!("plotting {}: {e}", path.display()))
}
