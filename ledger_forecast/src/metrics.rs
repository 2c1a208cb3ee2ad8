//! Metrics for evaluating forecast performance
//!
//! The free functions compare equally long slices of actual and predicted
//! values; if the lengths differ only the common prefix is scored. Every
//! degenerate case (nothing to compare, zero actuals, a constant test set)
//! yields `0.0` rather than `NaN`.

use crate::config::ForecastMethod;
use crate::forecaster::SeriesForecaster;
use ledger_math::statistics::mean;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Training observations required on top of the held-out window
pub const MIN_TRAINING_POINTS: usize = 6;

fn common<'a>(actual: &'a [f64], predicted: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = actual.len().min(predicted.len());
    (&actual[..n], &predicted[..n])
}

/// Mean of `|actual - predicted|`
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let (actual, predicted) = common(actual, predicted);
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Mean of `|actual - predicted| / actual`, in percent.
///
/// Undefined, and reported as 0, when any actual value is exactly zero.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let (actual, predicted) = common(actual, predicted);
    if actual.is_empty() || actual.iter().any(|&a| a == 0.0) {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum::<f64>()
        / actual.len() as f64
        * 100.0
}

/// Square root of the mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let (actual, predicted) = common(actual, predicted);
    if actual.is_empty() {
        return 0.0;
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// Negative when the predictions are worse than the mean of the actuals;
/// 0 when the actuals have no variance.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    let (actual, predicted) = common(actual, predicted);
    let actual_mean = mean(actual);

    let ss_tot: f64 = actual.iter().map(|a| (a - actual_mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }

    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    1.0 - ss_res / ss_tot
}

/// Forecast accuracy on a held-out window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub mean_absolute_error: f64,
    /// Percent; 0 when a held-out value is zero
    pub mean_absolute_percentage_error: f64,
    pub root_mean_squared_error: f64,
    /// May be negative; 0 when the held-out values are constant
    pub r_squared: f64,
}

impl AccuracyReport {
    /// Score predictions against actual values
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        Self {
            mean_absolute_error: mean_absolute_error(actual, predicted),
            mean_absolute_percentage_error: mean_absolute_percentage_error(actual, predicted),
            root_mean_squared_error: root_mean_squared_error(actual, predicted),
            r_squared: r_squared(actual, predicted),
        }
    }
}

impl fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast Accuracy:")?;
        writeln!(f, "  MAE:   {:.4}", self.mean_absolute_error)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mean_absolute_percentage_error)?;
        writeln!(f, "  RMSE:  {:.4}", self.root_mean_squared_error)?;
        writeln!(f, "  R²:    {:.4}", self.r_squared)?;
        Ok(())
    }
}

/// Backtests a forecasting method on the tail of a series
#[derive(Debug, Clone, Default)]
pub struct AccuracyEvaluator {
    forecaster: SeriesForecaster,
}

impl AccuracyEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold out the last `test_periods` values, forecast them from the rest
    /// with simple exponential smoothing, and score the result.
    ///
    /// Returns an all-zero report unless the series has at least
    /// `test_periods + 6` values.
    pub fn evaluate(&self, series: &[f64], test_periods: usize) -> AccuracyReport {
        self.evaluate_method(series, test_periods, ForecastMethod::ExponentialSmoothing)
    }

    /// Same as [`AccuracyEvaluator::evaluate`] with a chosen method
    pub fn evaluate_method(
        &self,
        series: &[f64],
        test_periods: usize,
        method: ForecastMethod,
    ) -> AccuracyReport {
        if test_periods == 0 || series.len() < test_periods + MIN_TRAINING_POINTS {
            warn!(
                observations = series.len(),
                test_periods,
                "not enough history to evaluate accuracy"
            );
            return AccuracyReport::default();
        }

        let (train, test) = series.split_at(series.len() - test_periods);
        let predicted: Vec<f64> = self
            .forecaster
            .forecast(train, test_periods, method)
            .iter()
            .map(|point| point.predicted_value)
            .collect();

        let report = AccuracyReport::compute(test, &predicted);
        debug!(%method, mae = report.mean_absolute_error, rmse = report.root_mean_squared_error, "evaluated forecast");
        report
    }
}
