//! Moving average model for time series forecasting

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};

/// Trailing window used by the engine
pub const DEFAULT_WINDOW: usize = 3;

/// Simple moving average model
///
/// The effective window shrinks to the series length when fewer than
/// `window` observations are available.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Name of the model
    name: String,
    /// Window size
    window: usize,
}

/// Trained moving average model
#[derive(Debug, Clone)]
pub struct TrainedMovingAverage {
    /// Name of the model
    name: String,
    /// Window size after shrinking to the history length
    window: usize,
    /// Mean of the trailing window
    last_average: f64,
}

impl MovingAverage {
    /// Create a new moving average model
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: "moving_average".to_string(),
            window,
        })
    }

    /// Configured window size
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self {
            name: "moving_average".to_string(),
            window: DEFAULT_WINDOW,
        }
    }
}

impl ForecastModel for MovingAverage {
    type Trained = TrainedMovingAverage;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        let window = self.window.min(values.len());
        let tail = &values[values.len() - window..];
        let last_average = tail.iter().sum::<f64>() / window as f64;

        Ok(TrainedMovingAverage {
            name: self.name.clone(),
            window,
            last_average,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedMovingAverage {
    /// Window actually used for the average
    pub fn window(&self) -> usize {
        self.window
    }
}

impl TrainedForecastModel for TrainedMovingAverage {
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        vec![self.last_average; horizon]
    }

    fn name(&self) -> &str {
        &self.name
    }
}
