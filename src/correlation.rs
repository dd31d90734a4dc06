//! Agreement score between the subject and gold-standard curves.
//!
//! ```text
//! r = pearson(zscore(subject), zscore(gold))      NaN → 0
//! z = ½ · ln((1 + r) / (1 − r))                    Fisher r-to-z
//! ```
//!
//! A NaN `r` arises whenever one curve has zero variance, which is always
//! the case for a block without button presses.  It is scored as "no
//! agreement" rather than reported.
use ndarray::Array1;

use crate::config::FisherGuard;
use crate::error::{EaError, EaResult};
use crate::normalize::mean_std;

/// Pearson correlation coefficient.  NaN for mismatched lengths, fewer than
/// two samples, or a zero-variance input.
pub fn pearson(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return f64::NAN;
    }
    let (ma, sa) = mean_std(a);
    let (mb, sb) = mean_std(b);
    let n = a.len() as f64;
    let cov = a.iter().zip(b.iter())
        .map(|(&x, &y)| (x - ma) * (y - mb))
        .sum::<f64>() / n;
    // 0 / 0 → NaN for constant input, as numpy's corrcoef.
    (cov / (sa * sb)).clamp(-1.0, 1.0)
}

/// Fisher's r-to-z transform, without any guard.
#[inline]
pub fn r2z(r: f64) -> f64 {
    0.5 * ((1.0 + r) / (1.0 - r)).ln()
}

/// Fisher transform with the `|r| = 1` boundary handled by `guard`.
///
/// `Clamp(limit)` caps `|r|` at `limit` for every input, so near-identical
/// curves saturate at the same `z` as identical ones.
pub fn fisher_z(r: f64, guard: FisherGuard) -> EaResult<f64> {
    match guard {
        FisherGuard::Clamp(limit) => {
            let limit = limit.abs().min(1.0 - f64::EPSILON);
            Ok(r2z(r.clamp(-limit, limit)))
        }
        FisherGuard::Reject if r.abs() < 1.0 => Ok(r2z(r)),
        FisherGuard::Reject => Err(EaError::SaturatedCorrelation(r)),
    }
}

/// Correlation between two standardised curves, NaN replaced by 0, then
/// Fisher-transformed.  Returns `(r, z)`.
pub fn score_curves(subject: &Array1<f64>, gold: &Array1<f64>, guard: FisherGuard) -> EaResult<(f64, f64)> {
    let mut r = pearson(subject, gold);
    if r.is_nan() {
        r = 0.0;
    }
    Ok((r, fisher_z(r, guard)?))
}
