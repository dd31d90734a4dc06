use empacc::normalize::mean_std;
use empacc::{fisher_z, match_lengths, pearson, r2z, score_curves, zscore, FisherGuard};
use ndarray::Array1;

fn curves() -> Vec<Array1<f64>> {
    vec![
        Array1::from_shape_fn(100, |i| if i < 30 { 5.0 } else if i < 70 { 8.0 } else { 2.0 }),
        Array1::from_shape_fn(4_000, |i| (i as f64 * 0.003).sin() * 4.0 + 5.0),
        Array1::from(vec![1.0, 9.0]),
        Array1::from_shape_fn(777, |i| ((i * 37) % 9 + 1) as f64),
    ]
}

#[test]
fn standardisation_round_trip() {
    for (k, c) in curves().iter().enumerate() {
        let z = zscore(c);
        let (m, s) = mean_std(&z);
        assert!(m.abs() < 1e-10, "curve {k}: mean {m:.2e}");
        approx::assert_abs_diff_eq!(s, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn correlation_is_unchanged_by_standardisation() {
    let c = curves();
    let a = &c[1];
    let b = match_lengths(a, &c[3]);
    let raw = pearson(a, &b);
    let std = pearson(&zscore(a), &zscore(&b));
    approx::assert_abs_diff_eq!(raw, std, epsilon = 1e-10);
}

#[test]
fn fisher_transform_is_odd() {
    for k in 1..200 {
        let r = -0.995 + k as f64 * 0.00995;
        approx::assert_abs_diff_eq!(r2z(-r), -r2z(r), epsilon = 1e-12);
    }
    assert_eq!(r2z(0.0), 0.0);
}

#[test]
fn fisher_transform_is_monotonic() {
    let zs: Vec<f64> = (-999..=999)
        .map(|k| fisher_z(k as f64 / 1000.0, FisherGuard::Reject).unwrap())
        .collect();
    assert!(zs.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn clamp_guard_keeps_sign_and_stays_finite() {
    let a = Array1::from_shape_fn(50, |i| i as f64);
    let (r, z) = score_curves(&a, &a, FisherGuard::default()).unwrap();
    approx::assert_abs_diff_eq!(r, 1.0, epsilon = 1e-12);
    assert!(z.is_finite() && z > 0.0);

    let neg = a.mapv(|v| -v);
    let (_, z) = score_curves(&a, &neg, FisherGuard::default()).unwrap();
    assert!(z.is_finite() && z < 0.0);

    assert!(fisher_z(1.0, FisherGuard::Reject).is_err());
    assert!(fisher_z(-1.0, FisherGuard::Reject).is_err());
}

#[test]
fn constant_input_scores_zero() {
    let flat = Array1::from_elem(300, 5.0);
    let gold = Array1::from_shape_fn(300, |i| (i as f64).sqrt());
    let (r, z) = score_curves(&zscore(&flat), &zscore(&gold), FisherGuard::default()).unwrap();
    assert_eq!((r, z), (0.0, 0.0));
}
