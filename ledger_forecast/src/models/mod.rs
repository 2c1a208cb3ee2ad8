//! Forecasting models for monthly series

use crate::data::Period;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// z-score of a two-sided 95% normal interval
pub const Z_95: f64 = 1.96;

/// One forecasted month
///
/// Invariant: `0 <= lower_bound <= predicted_value <= upper_bound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Horizon, 1 for the first forecasted period
    pub step: usize,
    /// Calendar month, when the input series carried periods
    pub period: Option<Period>,
    /// Point forecast, never negative
    pub predicted_value: f64,
    /// Lower end of the interval, never negative
    pub lower_bound: f64,
    /// Upper end of the interval
    pub upper_bound: f64,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Name of the model that produced the point
    pub model: String,
}

impl ForecastPoint {
    /// Build a point around a raw prediction.
    ///
    /// The prediction is clamped at zero, the interval is `±half_width`
    /// around it with the lower bound clamped at zero.
    pub fn new(
        step: usize,
        predicted: f64,
        half_width: f64,
        confidence: f64,
        model: impl Into<String>,
    ) -> Self {
        let predicted_value = if predicted.is_finite() { predicted.max(0.0) } else { 0.0 };
        let half_width = if half_width.is_finite() { half_width.abs() } else { 0.0 };

        Self {
            step,
            period: None,
            predicted_value,
            lower_bound: (predicted_value - half_width).max(0.0),
            upper_bound: predicted_value + half_width,
            confidence: confidence.clamp(0.0, 1.0),
            model: model.into(),
        }
    }

    /// Attach a calendar month
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Width of the interval
    pub fn interval_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Check the ordering and range invariants
    pub fn is_consistent(&self) -> bool {
        self.lower_bound >= 0.0
            && self.lower_bound <= self.predicted_value
            && self.predicted_value <= self.upper_bound
            && (0.0..=1.0).contains(&self.confidence)
    }
}

/// Label forecast points with the months following `last`
pub fn label_periods(points: Vec<ForecastPoint>, last: Period) -> Vec<ForecastPoint> {
    let periods = last.following(points.len());
    points
        .into_iter()
        .zip(periods)
        .map(|(point, period)| point.with_period(period))
        .collect()
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Raw point forecasts for the next `horizon` periods
    fn forecast(&self, horizon: usize) -> Vec<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a series of values
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on chronologically ordered values
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod exponential_smoothing;
pub mod linear_regression;
pub mod moving_average;
pub mod seasonal;

pub use exponential_smoothing::{HoltLinear, SimpleExponentialSmoothing};
pub use linear_regression::LinearTrend;
pub use moving_average::MovingAverage;
pub use seasonal::SeasonalHolt;
