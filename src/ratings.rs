//! Subject rating-curve reconstruction.
//!
//! The participant moves a 1–9 slider with two buttons; the log only records
//! the value after each press.  The continuous curve is rebuilt by
//! last-value hold: the neutral value until the first press, then each
//! pressed value until the next press or the end of the block.
//!
//! ```text
//! presses:   (t=10, 7)  (t=40, 3)  (t=70, 5)
//! curve:     5 … 5 | 7 … 7 | 3 … 3 | 5 … 5
//! index:     0       10      40      70     len
//! ```
use log::debug;
use ndarray::{s, Array1};

use crate::blocks::Block;
use crate::config::{AlignmentPolicy, AnalysisConfig};
use crate::error::EaResult;
use crate::eventlog::RatingEvent;

/// A reconstructed subject curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingCurve {
    pub values:    Array1<f64>,
    /// Button presses inside the block.
    pub pushes:    usize,
    /// Presses that could not be placed on the sample timeline.
    pub unaligned: usize,
}

impl RatingCurve {
    /// Curve for a block without any press.
    pub fn no_response(n_samples: usize, neutral: f64) -> Self {
        Self { values: Array1::from_elem(n_samples, neutral), pushes: 0, unaligned: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Sample index of `time` on the timeline `start + i * period`, `i < n`.
pub fn locate(time: i64, start: i64, period: i64, n: usize, policy: AlignmentPolicy) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let period = period.max(1);
    let offset = time - start;
    match policy {
        AlignmentPolicy::Exact => {
            if offset < 0 || offset % period != 0 {
                return None;
            }
            let idx = (offset / period) as usize;
            (idx < n).then_some(idx)
        }
        AlignmentPolicy::Nearest => {
            let idx = (offset as f64 / period as f64).round();
            Some(idx.clamp(0.0, (n - 1) as f64) as usize)
        }
    }
}

/// Rebuild the subject's curve for one block.
///
/// `last_trial` is the trial index of the log's final `Picture` row and
/// bounds the last block.  `n_samples` is the block length on the curve's
/// timeline (see [`AnalysisConfig::samples_for`]).
pub fn find_ratings(
    events: &[RatingEvent],
    block: &Block,
    last_trial: i64,
    n_samples: usize,
    cfg: &AnalysisConfig,
) -> EaResult<RatingCurve> {
    let mut presses = events
        .iter()
        .filter(|ev| block.contains_trial(ev.trial, last_trial))
        .filter(|ev| ev.is_response())
        .map(|ev| Ok((ev.time, ev.rated_value()?)))
        .collect::<EaResult<Vec<(i64, u8)>>>()?;

    if presses.is_empty() {
        return Ok(RatingCurve::no_response(n_samples, cfg.neutral_rating));
    }
    presses.sort_by_key(|&(time, _)| time);

    let mut values = Array1::from_elem(n_samples, cfg.neutral_rating);
    let mut current = cfg.neutral_rating;
    let mut last = 0usize;
    let mut unaligned = 0usize;

    for &(time, rating) in &presses {
        let Some(idx) = locate(time, block.start_time, cfg.sample_period_ticks, n_samples, cfg.alignment)
        else {
            debug!("{}: press at {time} (rating {rating}) is off the sample grid", block.label);
            unaligned += 1;
            continue;
        };
        values.slice_mut(s![last..idx]).fill(current);
        current = rating as f64;
        last = idx;
    }
    values.slice_mut(s![last..]).fill(current);

    Ok(RatingCurve { values, pushes: presses.len(), unaligned })
}
