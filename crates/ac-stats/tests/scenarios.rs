//! Reference scenarios for the comparison engine.

use ac_stats::*;

#[test]
fn rmse_small_series() {
    let v = rmse(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 3.0, 3.0, 2.0, 5.0]);
    assert!((v - 1.0).abs() < 1e-12, "rmse = {v}");
}

#[test]
fn correlation_perfect_negative() {
    let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[5.0, 4.0, 3.0, 2.0, 1.0]);
    assert!((r + 1.0).abs() < 1e-12, "r = {r}");
}

#[test]
fn correlation_constant_series_policy() {
    assert_eq!(pearson(&[2.0, 2.0, 2.0, 2.0], &[1.0, 3.0, 5.0, 7.0]), 0.0);
}

#[test]
fn empty_error_metrics_are_undefined() {
    assert!(rmse(&[], &[]).is_nan());
    assert!(mbe(&[], &[]).is_nan());
}

#[test]
fn hundred_samples_ten_bins() {
    let values: Vec<f64> = (0..100).map(f64::from).collect();
    let h = histogram(&values, 10).expect("10 bins is valid");
    assert_eq!(h.bins.len(), 10);
    assert!(h.bins.iter().all(|b| b.count == 10));
}

#[test]
fn percent_difference_with_zero_reference() {
    let reference = Series::from_pairs([
        (Coordinate::from("2019-07-01"), 0.0),
        (Coordinate::from("2019-07-02"), 20.0),
    ]);
    let candidate = Series::from_pairs([
        (Coordinate::from("2019-07-01"), 4.0),
        (Coordinate::from("2019-07-02"), 25.0),
    ]);
    let d = difference(&candidate, &reference, DifferenceMode::from_normalize(true));
    assert_eq!(d.points[0].value, None);
    assert_eq!(d.points[1].value, Some(25.0));
    assert!(d.points.iter().flat_map(|p| p.value).all(f64::is_finite));
}

#[test]
fn taylor_and_error_metrics_agree_for_unbiased_candidate() {
    // With zero mean bias the centered RMSE equals the plain RMSE.
    let reference = [30.0, 32.0, 35.0, 31.0, 29.0, 33.0];
    let candidate = [31.0, 31.0, 36.0, 30.0, 30.0, 32.0];
    let metrics = error_metrics(&candidate, &reference);
    assert!(metrics.mbe.abs() < 1e-12);

    let point = taylor_point(&candidate, &reference);
    assert!((point.centered_rmse - metrics.rmse).abs() < 1e-9);
}

#[test]
fn summary_of_ozone_like_column() {
    let values = [28.1, 30.4, f64::NAN, 35.2, 41.0, 38.7, 29.9, 33.3];
    let s = summarize(&values);
    assert_eq!(s.count, 7);
    assert_eq!(s.min, 28.1);
    assert_eq!(s.max, 41.0);
    assert_eq!(s.median, 33.3);
    // floor(7 * 0.25) = 1 -> second smallest
    assert_eq!(s.p25, 29.9);
}

#[test]
fn trend_on_rising_series() {
    let values: Vec<f64> = (0..24).map(|i| 40.0 + 0.5 * i as f64).collect();
    let t = trend(&values, TrendConfig::default()).expect("default config is valid");
    assert_eq!(t.smoothed.len(), 24);
    assert_eq!(t.smoothed.iter().filter(|v| v.is_none()).count(), 4);
    assert_eq!(t.direction, TrendDirection::Increasing);
}
