//! Analysis configuration.
//!
//! [`AnalysisConfig`] holds every tunable parameter of the behavioural
//! scoring pipeline.  All fields have defaults that reproduce the production
//! empathic-accuracy analysis.
use std::fmt;
use std::str::FromStr;

use crate::error::EaError;

/// Which family of blocks ends up in the timing file.
///
/// The leading character of a block label is the discriminator: `c` marks a
/// control (circles) block, anything else a target video block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrialType {
    /// Empathic-accuracy videos: every label *not* starting with `c`.
    #[default]
    Vid,
    /// Circles control task: labels starting with `c`.
    Cvid,
}

impl TrialType {
    /// `true` when a block with this label belongs to the trial type.
    pub fn accepts(&self, label: &str) -> bool {
        let is_control = label.starts_with('c');
        match self {
            TrialType::Vid => !is_control,
            TrialType::Cvid => is_control,
        }
    }
}

impl FromStr for TrialType {
    type Err = EaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vid" => Ok(TrialType::Vid),
            "cvid" => Ok(TrialType::Cvid),
            other => Err(EaError::InvalidTrialType(other.to_string())),
        }
    }
}

impl fmt::Display for TrialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrialType::Vid => "vid",
            TrialType::Cvid => "cvid",
        })
    }
}

/// How a button press is placed on the block's sample timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentPolicy {
    /// Only a sample whose timestamp equals the press time takes the new
    /// value.  Presses that fall between samples (or outside the block) are
    /// dropped from the curve and counted in `RatingCurve::unaligned`.
    #[default]
    Exact,
    /// Snap to the closest sample, clamped into the block.
    Nearest,
}

/// Guard for the Fisher transform at the `|r| = 1` boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FisherGuard {
    /// Clamp `r` into `[-limit, limit]` before transforming.
    Clamp(f64),
    /// Fail with `EaError::SaturatedCorrelation`.
    Reject,
}

impl Default for FisherGuard {
    fn default() -> Self {
        FisherGuard::Clamp(1.0 - 1e-6)
    }
}

/// Configuration for the empathic-accuracy scoring pipeline.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use empacc::{AnalysisConfig, TrialType};
///
/// let cfg = AnalysisConfig {
///     trial_type: TrialType::Cvid,   // score the circles task instead
///     onset_shift_secs: 0.0,         // no discarded volumes
///     ..AnalysisConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Blocks retained in the timing file and QC table.
    ///
    /// Default: [`TrialType::Vid`].
    pub trial_type: TrialType,

    /// Event-clock resolution.  Presentation logs count time in 10⁻⁴ s.
    ///
    /// Default: `10_000`.
    pub ticks_per_second: i64,

    /// Spacing of the reconstructed rating curve in event-clock ticks.
    ///
    /// At the default of one tick the curve holds one sample per 10⁻⁴ s
    /// and every in-block press lands exactly on a sample.
    ///
    /// Default: `1`.
    pub sample_period_ticks: i64,

    /// Value held before the first press and used for silent blocks.
    ///
    /// Default: `5.0` (midpoint of the 1–9 scale).
    pub neutral_rating: f64,

    /// Default: [`AlignmentPolicy::Exact`].
    pub alignment: AlignmentPolicy,

    /// Default: [`FisherGuard::Clamp`] at `1 − 1e-6`.
    pub fisher_guard: FisherGuard,

    /// Seconds subtracted from every onset when the timing file is written.
    ///
    /// The scanner discards the first four 2-s volumes, so onsets relative to
    /// `MRI_start` are shifted back by 8 s.
    ///
    /// Default: `8.0`.
    pub onset_shift_secs: f64,

    /// Rows between the label header and the numeric data in the reference
    /// tables.
    ///
    /// Default: `1`.
    pub reference_skip_rows: usize,

    /// Number of task runs a subject must have before it is scored.
    ///
    /// Default: `3`.
    pub expected_runs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trial_type: TrialType::Vid,
            ticks_per_second: 10_000,
            sample_period_ticks: 1,
            neutral_rating: 5.0,
            alignment: AlignmentPolicy::Exact,
            fisher_guard: FisherGuard::default(),
            onset_shift_secs: 8.0,
            reference_skip_rows: 1,
            expected_runs: 3,
        }
    }
}

impl AnalysisConfig {
    /// Number of curve samples covering `duration_secs`.
    ///
    /// ```
    /// use empacc::AnalysisConfig;
    /// let cfg = AnalysisConfig::default();
    /// assert_eq!(cfg.samples_for(2.5), 25_000);
    /// ```
    pub fn samples_for(&self, duration_secs: f64) -> usize {
        let ticks = (duration_secs * self.ticks_per_second as f64).round();
        (ticks / self.sample_period_ticks.max(1) as f64).round().max(0.0) as usize
    }
}
