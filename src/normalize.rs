//! Z-score standardisation of rating curves.
//!
//! `zscore_inplace` matches `(x - x.mean()) / x.std()` with `ddof = 0`.
//!
//! A constant curve (σ = 0) cannot be standardised.  It is centred to all
//! zeros instead, so it plots as a flat line and correlates as NaN.
use ndarray::Array1;

/// Population mean and standard deviation, accumulated in f64.
pub fn mean_std(data: &Array1<f64>) -> (f64, f64) {
    let n = data.len() as f64;
    if n == 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = data.sum() / n;
    let var = data.iter().map(|&v| {
        let d = v - mean; d * d
    }).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Standardise in place. Returns the (mean, std) used.
pub fn zscore_inplace(data: &mut Array1<f64>) -> (f64, f64) {
    let (mean, std) = mean_std(data);
    if std > 0.0 {
        data.mapv_inplace(|v| (v - mean) / std);
    } else if !data.is_empty() {
        data.fill(0.0);
    }
    (mean, std)
}

/// Standardised copy.
pub fn zscore(data: &Array1<f64>) -> Array1<f64> {
    let mut out = data.clone();
    zscore_inplace(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zscore_mean_zero_std_one() {
        let mut data = Array1::from_shape_fn(512, |t| (t as f64 * 0.1).sin() * 3.0 + 5.0);
        let (mean, std) = zscore_inplace(&mut data);
        let (out_mean, out_std) = mean_std(&data);

        approx::assert_abs_diff_eq!(out_mean, 0.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(out_std, 1.0, epsilon = 1e-12);
        // Returned params are the original mean/std, not post-normalization.
        assert!(std > 0.0);
        approx::assert_abs_diff_eq!(mean, 5.0, epsilon = 0.1);
    }

    #[test]
    fn zscore_constant_curve_is_centred() {
        let mut data = Array1::from_elem(64, 5.0);
        let (m, s) = zscore_inplace(&mut data);
        assert_eq!(m, 5.0);
        assert_eq!(s, 0.0);
        assert!(data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zscore_empty_is_noop() {
        let mut data = Array1::<f64>::zeros(0);
        let (m, s) = zscore_inplace(&mut data);
        assert!(m.is_nan() && s.is_nan());
    }
}
