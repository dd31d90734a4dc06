//! Output files of a scored subject.
//!
//! - `{sub}_block-times_ea.1D`        : timing file, one line per run.
//! - `{sub}_corr_push.csv`            : QC table, one row per block.
//! - `{sub}_analysis-complete.json`   : completion marker.
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::timing::TimingColumns;

pub const QC_HEADER: [&str; 2] = ["correlation", "n-pushes-per-minute"];

/// Paths of every file written for one subject.
#[derive(Debug, Clone)]
pub struct SubjectOutputs {
    pub dir:     PathBuf,
    pub subject: String,
}

impl SubjectOutputs {
    pub fn new(func_path: &Path, subject: &str) -> Self {
        Self { dir: func_path.join(subject), subject: subject.to_string() }
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}_{suffix}", self.subject))
    }

    pub fn timing_file(&self) -> PathBuf {
        self.file("block-times_ea.1D")
    }

    pub fn qc_file(&self) -> PathBuf {
        self.file("corr_push.csv")
    }

    pub fn marker_file(&self) -> PathBuf {
        self.file("analysis-complete.json")
    }

    pub fn glm_script(&self) -> PathBuf {
        self.file("glm_1stlevel_cmd.sh")
    }

    /// Diagnostic plot for the log at `log_path`.
    pub fn plot_file(&self, log_path: &Path) -> PathBuf {
        let stem = log_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".into());
        self.file(&format!("{stem}.svg"))
    }

    pub fn create_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))
    }
}

/// Write the timing file: one line per run, in run order.
pub fn write_timing_file(path: &Path, runs: &[TimingColumns], onset_shift: f64) -> Result<()> {
    let mut f = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for run in runs {
        f.write_all(run.timing_line(onset_shift).as_bytes())?;
    }
    Ok(())
}

/// Write the QC table for all runs of a subject.
pub fn write_qc_table(path: &Path, runs: &[TimingColumns]) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record(QC_HEADER)?;
    for run in runs {
        for row in run.qc_rows() {
            w.write_record(&row)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Persisted record that a subject's analysis finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMarker {
    pub subject:    String,
    pub trial_type: String,
    pub logs:       Vec<PathBuf>,
    pub blocks:     usize,
    pub glm_run:    bool,
}

impl CompletionMarker {
    pub fn write(&self, path: &Path) -> Result<()> {
        let f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(f, self)?;
        Ok(())
    }

    /// Read a marker; `None` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let f = std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let marker = serde_json::from_reader(f)
            .with_context(|| format!("parsing completion marker {}", path.display()))?;
        Ok(Some(marker))
    }
}
