//! Per-block scores and the AFNI stimulus-timing encoding.
//!
//! Every qualifying block becomes one `-stim_times_AM2` token:
//!
//! ```text
//! onset*amplitude,pushrate:duration      e.g.  30.00*0.41,12.50:45.00
//! ```
//!
//! `amplitude` is the Fisher-z agreement score, `pushrate` the number of
//! button presses per minute (a modulator of no interest) and `duration`
//! the block length in seconds, consumed by `dmBLOCK(1)`.  One line per run.
use crate::config::TrialType;

/// Summary of one scored block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockScore {
    pub label:             String,
    pub onset_seconds:     f64,
    pub duration_seconds:  f64,
    /// Pearson r after NaN substitution.
    pub r:                 f64,
    pub correlation_z:     f64,
    pub pushes:            usize,
    pub pushes_per_minute: f64,
    pub unaligned:         usize,
}

/// Button presses per minute.
#[inline]
pub fn pushes_per_minute(pushes: usize, duration_seconds: f64) -> f64 {
    if duration_seconds > 0.0 {
        pushes as f64 / (duration_seconds / 60.0)
    } else {
        0.0
    }
}

/// Parallel per-block vectors for one trial type, in block order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingColumns {
    pub onsets:       Vec<f64>,
    pub durations:    Vec<f64>,
    pub correlations: Vec<f64>,
    pub push_rates:   Vec<f64>,
}

impl TimingColumns {
    /// Keep the blocks belonging to `trial_type`.
    pub fn select(scores: &[BlockScore], trial_type: TrialType) -> Self {
        let mut cols = Self::default();
        for s in scores.iter().filter(|s| trial_type.accepts(&s.label)) {
            cols.onsets.push(s.onset_seconds);
            cols.durations.push(s.duration_seconds);
            cols.correlations.push(s.correlation_z);
            cols.push_rates.push(s.pushes_per_minute);
        }
        cols
    }

    pub fn len(&self) -> usize {
        self.onsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.onsets.is_empty()
    }

    /// One run's line of the timing file, newline included.
    ///
    /// `onset_shift` seconds are subtracted from each onset.  A run with no
    /// qualifying block is written as `*`, AFNI's empty-run marker.
    pub fn timing_line(&self, onset_shift: f64) -> String {
        if self.is_empty() {
            return "*\n".to_string();
        }
        let tokens: Vec<String> = (0..self.len())
            .map(|i| {
                format_token(
                    self.onsets[i] - onset_shift,
                    self.correlations[i],
                    self.push_rates[i],
                    self.durations[i],
                )
            })
            .collect();
        format!("{}\n", tokens.join(" "))
    }

    /// QC rows: `(correlation, pushes per minute)` to two decimals.
    pub fn qc_rows(&self) -> Vec<[String; 2]> {
        self.correlations
            .iter()
            .zip(&self.push_rates)
            .map(|(r, p)| [format!("{r:.2}"), format!("{p:.2}")])
            .collect()
    }
}

/// `onset*amplitude,pushrate:duration`, every number to two decimals.
pub fn format_token(onset: f64, amplitude: f64, push_rate: f64, duration: f64) -> String {
    format!("{onset:.2}*{amplitude:.2},{push_rate:.2}:{duration:.2}")
}
