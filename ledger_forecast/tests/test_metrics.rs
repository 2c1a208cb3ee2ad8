use approx::assert_abs_diff_eq;
use ledger_forecast::metrics::{
    mean_absolute_error, mean_absolute_percentage_error, r_squared, root_mean_squared_error,
    AccuracyEvaluator, AccuracyReport,
};
use ledger_forecast::ForecastMethod;
use pretty_assertions::assert_eq;

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    assert_abs_diff_eq!(mean_absolute_error(&actual, &predicted), 2.4, epsilon = 1e-9);
    assert_abs_diff_eq!(root_mean_squared_error(&actual, &predicted), 6.0_f64.sqrt(), epsilon = 1e-9);
    // (0.2 + 0.1 + 0.1 + 0.075 + 0.04) / 5
    assert_abs_diff_eq!(mean_absolute_percentage_error(&actual, &predicted), 10.3, epsilon = 1e-9);
    assert!(r_squared(&actual, &predicted) > 0.9);
}

#[test]
fn test_metrics_on_nothing_are_zero() {
    let empty: Vec<f64> = vec![];
    let actual = vec![1.0, 2.0];

    assert_eq!(mean_absolute_error(&empty, &actual), 0.0);
    assert_eq!(root_mean_squared_error(&actual, &empty), 0.0);
    assert_eq!(mean_absolute_percentage_error(&empty, &empty), 0.0);
}

#[test]
fn test_r_squared_sentinel_and_sign() {
    assert_eq!(r_squared(&[5.0, 5.0, 5.0], &[4.0, 6.0, 5.0]), 0.0);
    assert_abs_diff_eq!(r_squared(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0, epsilon = 1e-12);
    assert!(r_squared(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) < 0.0);
}

#[test]
fn test_constant_series_is_predicted_perfectly() {
    let series = vec![500.0; 20];
    let report = AccuracyEvaluator::new().evaluate(&series, 3);

    assert_eq!(report.mean_absolute_error, 0.0);
    assert_eq!(report.root_mean_squared_error, 0.0);
    assert_eq!(report.mean_absolute_percentage_error, 0.0);
    assert_eq!(report.r_squared, 0.0);
    assert!(!report.r_squared.is_nan());
}

#[test]
fn test_not_enough_history_gives_zero_report() {
    let evaluator = AccuracyEvaluator::new();

    assert_eq!(evaluator.evaluate(&[100.0; 8], 3), AccuracyReport::default());
    assert_eq!(evaluator.evaluate(&[100.0; 20], 0), AccuracyReport::default());
}

#[test]
fn test_zero_in_held_out_values() {
    // Training history is flat at 100, so every held-out month is predicted as 100
    let mut series = vec![100.0; 10];
    series.extend([0.0, 100.0, 100.0]);

    let report = AccuracyEvaluator::new().evaluate(&series, 3);

    assert_abs_diff_eq!(report.mean_absolute_error, 100.0 / 3.0, epsilon = 1e-9);
    assert_eq!(report.mean_absolute_percentage_error, 0.0);
    assert_abs_diff_eq!(report.root_mean_squared_error, (10000.0_f64 / 3.0).sqrt(), epsilon = 1e-9);
    assert_abs_diff_eq!(report.r_squared, -0.5, epsilon = 1e-9);
}

#[test]
fn test_evaluate_other_method() {
    let series: Vec<f64> = (0..12).map(|i| 100.0 + 10.0 * i as f64).collect();
    let report = AccuracyEvaluator::new().evaluate_method(&series, 3, ForecastMethod::LinearRegression);

    assert!(report.mean_absolute_error < 1e-6);
    assert_abs_diff_eq!(report.r_squared, 1.0, epsilon = 1e-9);
}

#[test]
fn test_report_display() {
    let report = AccuracyReport::compute(&[100.0, 200.0], &[110.0, 190.0]);
    let text = report.to_string();

    assert!(text.contains("MAE"));
    assert!(text.contains("RMSE"));
}
