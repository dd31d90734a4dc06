mod common;
use common::LogBuilder;
use empacc::{find_blocks, find_ratings, parse_log, AlignmentPolicy, AnalysisConfig, EaError};

#[test]
fn scenario_three_presses_hold_values() {
    // Presses (7, 3, 5) at t = 10, 40, 70 over a 100-sample block.
    let text = LogBuilder::new(0)
        .video("vid_1", 0)
        .press(7, 10)
        .press(3, 40)
        .press(5, 70)
        .build();
    let log = parse_log(&text).unwrap();
    let blocks = find_blocks(&log.boundaries, log.mri_start, 10_000);
    let cfg = AnalysisConfig::default();

    let curve = find_ratings(&log.ratings, &blocks[0], log.last_trial().unwrap(), 100, &cfg).unwrap();

    assert_eq!(curve.pushes, 3);
    assert_eq!(curve.len(), 100);
    for (i, &v) in curve.values.iter().enumerate() {
        let expected = match i {
            0..=9 => 5.0,
            10..=39 => 7.0,
            40..=69 => 3.0,
            _ => 5.0,
        };
        assert_eq!(v, expected, "sample {i}");
    }
}

#[test]
fn change_points_sit_on_press_timestamps() {
    let start = 1_000_000;
    let times = [1_000_250, 1_003_000, 1_007_777];
    let ratings = [2u8, 9, 4];
    let mut b = LogBuilder::new(0).video("vid_1", start);
    for (&t, &r) in times.iter().zip(&ratings) {
        b = b.press(r, t);
    }
    let log = parse_log(&b.build()).unwrap();
    let blocks = find_blocks(&log.boundaries, log.mri_start, 10_000);
    let cfg = AnalysisConfig::default();
    let n = cfg.samples_for(1.0);
    let curve = find_ratings(&log.ratings, &blocks[0], log.last_trial().unwrap(), n, &cfg).unwrap();

    assert_eq!(curve.len(), 10_000);
    let changes: Vec<usize> = (1..curve.len())
        .filter(|&i| curve.values[i] != curve.values[i - 1])
        .collect();
    let expected: Vec<usize> = times.iter().map(|&t| (t - start) as usize).collect();
    assert_eq!(changes, expected);
    assert_eq!(curve.values[n - 1], 4.0);
}

#[test]
fn silent_block_is_constant_neutral() {
    let text = LogBuilder::new(0)
        .video("vid_1", 0)
        .picture("scale", 5)
        .video("vid_2", 900)
        .press(8, 950)
        .build();
    let log = parse_log(&text).unwrap();
    let blocks = find_blocks(&log.boundaries, log.mri_start, 10_000);
    let cfg = AnalysisConfig::default();

    let curve = find_ratings(&log.ratings, &blocks[0], log.last_trial().unwrap(), 600, &cfg).unwrap();
    assert_eq!(curve.pushes, 0);
    assert!(curve.values.iter().all(|&v| v == 5.0));

    // The press belongs to the final block only.
    let last = find_ratings(&log.ratings, &blocks[1], log.last_trial().unwrap(), 600, &cfg).unwrap();
    assert_eq!(last.pushes, 1);
}

#[test]
fn presses_are_walked_in_time_order() {
    // Logged out of order; the later timestamp must win at the tail.
    let text = LogBuilder::new(0)
        .video("vid_1", 0)
        .press(9, 60)
        .press(2, 20)
        .build();
    let log = parse_log(&text).unwrap();
    let blocks = find_blocks(&log.boundaries, log.mri_start, 10_000);
    let cfg = AnalysisConfig::default();
    let curve = find_ratings(&log.ratings, &blocks[0], log.last_trial().unwrap(), 80, &cfg).unwrap();
    assert_eq!(curve.values[19], 5.0);
    assert_eq!(curve.values[20], 2.0);
    assert_eq!(curve.values[59], 2.0);
    assert_eq!(curve.values[60], 9.0);
}

#[test]
fn coarse_grid_exact_vs_nearest() {
    // One sample per second; the first press falls between samples.
    let text = LogBuilder::new(0)
        .video("vid_1", 0)
        .press(8, 25_000)
        .press(3, 50_000)
        .build();
    let log = parse_log(&text).unwrap();
    let blocks = find_blocks(&log.boundaries, log.mri_start, 10_000);
    let last = log.last_trial().unwrap();

    let exact = AnalysisConfig { sample_period_ticks: 10_000, ..AnalysisConfig::default() };
    let n = exact.samples_for(8.0);
    assert_eq!(n, 8);
    let curve = find_ratings(&log.ratings, &blocks[0], last, n, &exact).unwrap();
    assert_eq!(curve.pushes, 2);
    assert_eq!(curve.unaligned, 1);
    assert_eq!(curve.values.to_vec(), vec![5.0, 5.0, 5.0, 5.0, 5.0, 3.0, 3.0, 3.0]);

    let nearest = AnalysisConfig { alignment: AlignmentPolicy::Nearest, ..exact };
    let curve = find_ratings(&log.ratings, &blocks[0], last, n, &nearest).unwrap();
    assert_eq!(curve.unaligned, 0);
    assert_eq!(curve.values.to_vec(), vec![5.0, 5.0, 5.0, 8.0, 8.0, 3.0, 3.0, 3.0]);
}

#[test]
fn malformed_rating_code_is_reported() {
    let text = LogBuilder::new(0)
        .video("vid_1", 0)
        .picture("rating_", 10)
        .build();
    let log = parse_log(&text).unwrap();
    let blocks = find_blocks(&log.boundaries, log.mri_start, 10_000);
    let err = find_ratings(&log.ratings, &blocks[0], log.last_trial().unwrap(), 50, &AnalysisConfig::default())
        .unwrap_err();
    assert!(matches!(err, EaError::MalformedResponse { .. }));
}
