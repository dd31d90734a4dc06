//! # empacc — empathic-accuracy behavioural scoring
//!
//! `empacc` turns the Presentation event logs of the empathic-accuracy fMRI
//! task into an amplitude-modulated stimulus-timing file for AFNI.  For every
//! video block it rebuilds the participant's continuous rating from sparse
//! button presses, compares it with the actor's own rating, and uses the
//! Fisher-z correlation as the block's amplitude.
//!
//! ## Pipeline overview
//!
//! ```text
//! UCLAEmpAcc_part1.log
//!   │
//!   ├─ eventlog::parse_log()       Picture / Video rows → typed streams + MRI_start
//!   ├─ blocks::find_blocks()       Video rows → blocks, onsets relative to MRI_start
//!   │    per block:
//!   ├─ ratings::find_ratings()     presses → last-value-hold curve, push count
//!   ├─ reference::align_curves()   gold curve stretched to the subject's length
//!   ├─ normalize::zscore()         both curves standardised
//!   ├─ correlation::score_curves() Pearson r (NaN → 0) → Fisher z
//!   └─ timing::TimingColumns       onset*z,pushrate:duration tokens
//!        │
//!        └─→ {sub}_block-times_ea.1D, {sub}_corr_push.csv, {sub}_{log}.svg
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use empacc::{process_log, AnalysisConfig, ReferenceSet, TimingColumns};
//! use empacc::eventlog::read_log;
//! use std::path::Path;
//!
//! let cfg  = AnalysisConfig::default();
//! let refs = ReferenceSet::load(Path::new("assets"), cfg.reference_skip_rows).unwrap();
//! let log  = read_log(Path::new("S01_UCLAEmpAcc_part1.log")).unwrap();
//!
//! let report = process_log(&log, &refs, &cfg).unwrap();
//! let cols   = TimingColumns::select(&report.scores, cfg.trial_type);
//! print!("{}", cols.timing_line(cfg.onset_shift_secs));
//! ```

pub mod batch;
pub mod blocks;
pub mod config;
pub mod correlation;
pub mod error;
pub mod eventlog;
pub mod glm;
pub mod io;
pub mod normalize;
pub mod plot;
pub mod ratings;
pub mod reference;
pub mod resample;
pub mod timing;

use log::{debug, warn};

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config
pub use config::{AlignmentPolicy, AnalysisConfig, FisherGuard, TrialType};

// errors
pub use error::{EaError, EaResult};

// log reading and segmentation
pub use blocks::{find_blocks, Block};
pub use eventlog::{parse_log, read_log, BoundaryEvent, EventKind, ParsedLog, RatingEvent};

// curves and scoring
pub use correlation::{fisher_z, pearson, r2z, score_curves};
pub use normalize::{zscore, zscore_inplace};
pub use ratings::{find_ratings, RatingCurve};
pub use reference::{align_curves, ReferenceSet, ReferenceTable};
pub use resample::{match_lengths, resample_linear};

// outputs
pub use io::{CompletionMarker, SubjectOutputs};
pub use plot::{plot_log, BlockTrace};
pub use timing::{BlockScore, TimingColumns};

/// A block that could not be scored.
#[derive(Debug)]
pub struct BlockFailure {
    pub label: String,
    pub error: EaError,
}

/// Everything derived from one log.
#[derive(Debug)]
pub struct LogReport {
    pub mri_start: i64,
    pub blocks:    Vec<Block>,
    /// Scores of every block that could be scored, in block order.
    pub scores:    Vec<BlockScore>,
    /// Standardised curves for the diagnostic plot, parallel to `scores`.
    pub traces:    Vec<BlockTrace>,
    pub failures:  Vec<BlockFailure>,
}

/// Score one block against the reference tables.
///
/// # Steps
///
/// 1. Look up the gold curve and the duration for the block label.
/// 2. Rebuild the subject curve over `duration` seconds.
/// 3. Align lengths (gold stretched, or subject broadcast when silent).
/// 4. Standardise both curves, correlate, Fisher-transform.
pub fn score_block(
    log: &ParsedLog,
    block: &Block,
    refs: &ReferenceSet,
    cfg: &AnalysisConfig,
) -> EaResult<(BlockScore, BlockTrace)> {
    let (gold, duration) = refs.lookup(&block.label)?;
    let n_samples = cfg.samples_for(duration);
    let last_trial = log.last_trial().unwrap_or(block.start_trial);

    let curve = find_ratings(&log.ratings, block, last_trial, n_samples, cfg)?;
    let (subject, gold) = align_curves(&curve, &gold, cfg.neutral_rating);

    let subject = zscore(&subject);
    let gold = zscore(&gold);
    let (r, z) = score_curves(&subject, &gold, cfg.fisher_guard)?;

    debug!(
        "{}: onset={:.2}s duration={duration}s pushes={} unaligned={} r={r:.4} z={z:.4}",
        block.label, block.onset_seconds, curve.pushes, curve.unaligned,
    );

    let score = BlockScore {
        label:             block.label.clone(),
        onset_seconds:     block.onset_seconds,
        duration_seconds:  duration,
        r,
        correlation_z:     z,
        pushes:            curve.pushes,
        pushes_per_minute: timing::pushes_per_minute(curve.pushes, duration),
        unaligned:         curve.unaligned,
    };
    let trace = BlockTrace { label: block.label.clone(), subject, gold, correlation_z: z };
    Ok((score, trace))
}

/// Run the **full scoring pipeline** on one parsed log.
///
/// Blocks are scored independently: a malformed response or a saturated
/// correlation drops only that block (recorded in
/// [`LogReport::failures`]).  A block label missing from the reference
/// tables fails the whole log, since the run's timing would be incomplete.
///
/// # Errors
///
/// [`EaError::MissingReferenceColumn`] or [`EaError::MissingReferenceData`].
pub fn process_log(log: &ParsedLog, refs: &ReferenceSet, cfg: &AnalysisConfig) -> EaResult<LogReport> {
    let blocks = find_blocks(&log.boundaries, log.mri_start, cfg.ticks_per_second);
    let mut scores = Vec::with_capacity(blocks.len());
    let mut traces = Vec::with_capacity(blocks.len());
    let mut failures = Vec::new();

    for block in &blocks {
        match score_block(log, block, refs, cfg) {
            Ok((score, trace)) => {
                scores.push(score);
                traces.push(trace);
            }
            Err(e @ (EaError::MissingReferenceColumn { .. } | EaError::MissingReferenceData { .. })) => {
                return Err(e);
            }
            Err(error) => {
                warn!("skipping block {}: {error}", block.label);
                failures.push(BlockFailure { label: block.label.clone(), error });
            }
        }
    }

    Ok(LogReport { mri_start: log.mri_start, blocks, scores, traces, failures })
}
