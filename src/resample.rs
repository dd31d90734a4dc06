//! Piecewise-linear length matching.
//!
//! The actor's gold-standard rating is sampled far more coarsely than the
//! reconstructed subject curve.  [`match_lengths`] stretches it onto the
//! subject's sample count:
//!
//!   1. Place the `m` source samples on the grid `0, 1, …, m−1`.
//!   2. Evaluate the linear interpolant at `n` evenly spaced positions
//!      `k · (m−1)/(n−1)`, `k = 0 … n−1`.
//!
//! Endpoints are preserved exactly.
use ndarray::Array1;

/// Resample `b` to `n` points by linear interpolation over a uniform grid.
///
/// A single-sample input broadcasts; an empty input or `n == 0` yields an
/// empty array.
pub fn resample_linear(b: &[f64], n: usize) -> Array1<f64> {
    let m = b.len();
    if m == 0 || n == 0 {
        return Array1::zeros(0);
    }
    if m == 1 {
        return Array1::from_elem(n, b[0]);
    }
    if n == 1 {
        return Array1::from_elem(1, b[0]);
    }

    let step = (m - 1) as f64 / (n - 1) as f64;
    Array1::from_shape_fn(n, |k| {
        let x = k as f64 * step;
        let i = (x.floor() as usize).min(m - 2);
        let frac = x - i as f64;
        b[i] + (b[i + 1] - b[i]) * frac
    })
}

/// Match the length of `b` to that of `a`.
pub fn match_lengths(a: &Array1<f64>, b: &Array1<f64>) -> Array1<f64> {
    match b.as_slice() {
        Some(slice) => resample_linear(slice, a.len()),
        None => resample_linear(&b.to_vec(), a.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsample_interpolates_midpoints() {
        let out = resample_linear(&[0.0, 2.0, 4.0], 5);
        assert_eq!(out.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn endpoints_preserved_on_downsample() {
        let src: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.01).sin()).collect();
        let out = resample_linear(&src, 37);
        assert_eq!(out.len(), 37);
        approx::assert_abs_diff_eq!(out[0], src[0], epsilon = 1e-12);
        approx::assert_abs_diff_eq!(out[36], src[999], epsilon = 1e-12);
    }

    #[test]
    fn same_length_is_identity() {
        let src = [3.0, 1.0, 4.0, 1.0, 5.0];
        let out = resample_linear(&src, 5);
        for (o, s) in out.iter().zip(src.iter()) {
            approx::assert_abs_diff_eq!(*o, *s, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(resample_linear(&[], 4).len(), 0);
        assert_eq!(resample_linear(&[7.0], 3).to_vec(), vec![7.0; 3]);
        assert_eq!(resample_linear(&[1.0, 2.0], 0).len(), 0);
    }

    #[test]
    fn match_lengths_follows_first_argument() {
        let a = Array1::zeros(9);
        let b = Array1::from(vec![1.0, 3.0]);
        let out = match_lengths(&a, &b);
        assert_eq!(out.len(), 9);
        approx::assert_abs_diff_eq!(out[4], 2.0, epsilon = 1e-12);
    }
}
