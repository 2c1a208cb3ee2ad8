//! Point and interval forecasts for a single monthly metric
//!
//! [`SeriesForecaster`] never fails. Short histories get a flat,
//! low-confidence "basic" forecast, a seasonal request on less than a year of
//! data degrades to simple exponential smoothing, and any model that cannot
//! be trained falls back the same way.

use crate::config::ForecastMethod;
use crate::data::MonthlySeries;
use crate::error::Result;
use crate::models::exponential_smoothing::{HoltLinear, SimpleExponentialSmoothing};
use crate::models::linear_regression::LinearTrend;
use crate::models::moving_average::MovingAverage;
use crate::models::seasonal::{SeasonalHolt, SEASON_LENGTH};
use crate::models::{label_periods, ForecastModel, ForecastPoint, TrainedForecastModel, Z_95};
use ledger_math::statistics::{mean, population_std_dev};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Minimum history for any fitted method
pub const MIN_HISTORY: usize = 3;
/// Confidence reported by fitted methods
pub const MODEL_CONFIDENCE: f64 = 0.95;
/// Confidence reported by the basic fallback
pub const BASIC_CONFIDENCE: f64 = 0.5;
/// Relative half-width of the basic fallback band
pub const BASIC_BAND: f64 = 0.2;

/// Weights of the built-in method blend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub exponential_smoothing: f64,
    pub holt: f64,
    pub moving_average: f64,
    pub linear_regression: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            exponential_smoothing: 0.3,
            holt: 0.3,
            moving_average: 0.2,
            linear_regression: 0.2,
        }
    }
}

/// Forecaster over the five built-in methods
#[derive(Debug, Clone, Default)]
pub struct SeriesForecaster {
    exponential_smoothing: SimpleExponentialSmoothing,
    holt: HoltLinear,
    moving_average: MovingAverage,
    linear_trend: LinearTrend,
    seasonal: SeasonalHolt,
    blend: BlendWeights,
}

fn train_and_forecast<M: ForecastModel>(model: &M, values: &[f64], periods: usize) -> Result<Vec<f64>> {
    Ok(model.train(values)?.forecast(periods))
}

impl SeriesForecaster {
    /// Forecaster with the engine's fixed parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Weights used by [`ForecastMethod::Ensemble`]
    pub fn blend_weights(&self) -> BlendWeights {
        self.blend
    }

    /// Forecast `periods` steps ahead of `values`.
    ///
    /// `periods` of zero is treated as one. Every returned point satisfies
    /// `0 <= lower <= predicted <= upper`.
    pub fn forecast(&self, values: &[f64], periods: usize, method: ForecastMethod) -> Vec<ForecastPoint> {
        let periods = periods.max(1);

        if values.len() < MIN_HISTORY {
            warn!(
                observations = values.len(),
                "not enough history for {}, using basic forecast",
                method
            );
            return Self::basic_forecast(values, periods);
        }

        let (predictions, model) = self.point_forecast(values, periods, method);
        let half_width = Z_95 * population_std_dev(values);

        debug!(model, periods, half_width, "forecast complete");

        predictions
            .into_iter()
            .enumerate()
            .map(|(i, predicted)| ForecastPoint::new(i + 1, predicted, half_width, MODEL_CONFIDENCE, model))
            .collect()
    }

    /// Forecast the months following the end of `series`
    pub fn forecast_series(
        &self,
        series: &MonthlySeries,
        periods: usize,
        method: ForecastMethod,
    ) -> Vec<ForecastPoint> {
        let points = self.forecast(&series.values(), periods, method);
        match series.last_period() {
            Some(last) => label_periods(points, last),
            None => points,
        }
    }

    /// Flat forecast at the mean of whatever history exists (zero if none),
    /// with a ±20% band and confidence 0.5
    pub fn basic_forecast(values: &[f64], periods: usize) -> Vec<ForecastPoint> {
        let level = mean(values).max(0.0);
        (1..=periods.max(1))
            .map(|step| ForecastPoint::new(step, level, BASIC_BAND * level, BASIC_CONFIDENCE, "basic"))
            .collect()
    }

    /// Raw predictions plus the name of the model that actually produced them
    fn point_forecast(&self, values: &[f64], periods: usize, method: ForecastMethod) -> (Vec<f64>, &'static str) {
        let attempt = match method {
            ForecastMethod::ExponentialSmoothing => {
                train_and_forecast(&self.exponential_smoothing, values, periods)
            }
            ForecastMethod::MovingAverage => train_and_forecast(&self.moving_average, values, periods),
            ForecastMethod::LinearRegression => train_and_forecast(&self.linear_trend, values, periods),
            ForecastMethod::Seasonal if values.len() < SEASON_LENGTH => {
                warn!(
                    observations = values.len(),
                    "seasonal forecast needs {} observations, using exponential smoothing",
                    SEASON_LENGTH
                );
                return self.smoothing_fallback(values, periods);
            }
            ForecastMethod::Seasonal => train_and_forecast(&self.seasonal, values, periods),
            ForecastMethod::Ensemble => self.blend(values, periods),
        };

        match attempt {
            Ok(predictions) => (predictions, method.as_str()),
            Err(err) => {
                warn!(error = %err, "{} failed, using exponential smoothing", method);
                self.smoothing_fallback(values, periods)
            }
        }
    }

    fn smoothing_fallback(&self, values: &[f64], periods: usize) -> (Vec<f64>, &'static str) {
        let predictions = train_and_forecast(&self.exponential_smoothing, values, periods)
            .unwrap_or_else(|_| vec![mean(values); periods]);
        (predictions, ForecastMethod::ExponentialSmoothing.as_str())
    }

    /// Weighted sum of the four base methods, step by step
    fn blend(&self, values: &[f64], periods: usize) -> Result<Vec<f64>> {
        let components = [
            (train_and_forecast(&self.exponential_smoothing, values, periods)?, self.blend.exponential_smoothing),
            (train_and_forecast(&self.holt, values, periods)?, self.blend.holt),
            (train_and_forecast(&self.moving_average, values, periods)?, self.blend.moving_average),
            (train_and_forecast(&self.linear_trend, values, periods)?, self.blend.linear_regression),
        ];

        Ok((0..periods)
            .map(|step| {
                components
                    .iter()
                    .map(|(forecast, weight)| weight * forecast[step])
                    .sum::<f64>()
            })
            .collect())
    }
}
