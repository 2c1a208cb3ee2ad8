//! Exponential smoothing models for time series forecasting

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use ledger_math::{DoubleExponentialSmoothing, ExponentialSmoothing};
use tracing::debug;

/// Level smoothing factor used by the engine
pub const DEFAULT_ALPHA: f64 = 0.3;
/// Trend smoothing factor used by the engine
pub const DEFAULT_BETA: f64 = 0.1;

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct SimpleExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Level smoothing factor in (0, 1)
    alpha: f64,
}

/// Trained simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedSimpleExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothed level after the last observation
    level: f64,
}

impl SimpleExponentialSmoothing {
    /// Create a new exponential smoothing model
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: "exponential_smoothing".to_string(),
            alpha,
        })
    }
}

impl Default for SimpleExponentialSmoothing {
    fn default() -> Self {
        Self {
            name: "exponential_smoothing".to_string(),
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ForecastModel for SimpleExponentialSmoothing {
    type Trained = TrainedSimpleExponentialSmoothing;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        let level = ExponentialSmoothing::fit(self.alpha, values)?.level()?;
        debug!(alpha = self.alpha, level, "fitted simple exponential smoothing");

        Ok(TrainedSimpleExponentialSmoothing {
            name: self.name.clone(),
            level,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSimpleExponentialSmoothing {
    /// Final smoothed level
    pub fn level(&self) -> f64 {
        self.level
    }
}

impl TrainedForecastModel for TrainedSimpleExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        // No trend term: every future period gets the last level
        vec![self.level; horizon]
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Holt's linear trend model (double exponential smoothing)
#[derive(Debug, Clone)]
pub struct HoltLinear {
    /// Name of the model
    name: String,
    /// Level smoothing factor in (0, 1)
    alpha: f64,
    /// Trend smoothing factor in (0, 1)
    beta: f64,
}

/// Trained Holt model
#[derive(Debug, Clone)]
pub struct TrainedHoltLinear {
    /// Name of the model
    name: String,
    /// Smoothed level after the last observation
    level: f64,
    /// Smoothed per-period trend after the last observation
    trend: f64,
}

impl HoltLinear {
    /// Create a new Holt model; both factors must lie strictly between 0 and 1
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        // Validate early so a bad pair fails at construction, not at training
        DoubleExponentialSmoothing::new(alpha, beta)?;

        Ok(Self {
            name: "holt".to_string(),
            alpha,
            beta,
        })
    }
}

impl Default for HoltLinear {
    fn default() -> Self {
        Self {
            name: "holt".to_string(),
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
        }
    }
}

impl ForecastModel for HoltLinear {
    type Trained = TrainedHoltLinear;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        if values.len() < 2 {
            return Err(ForecastError::DataError(
                "Holt's method needs at least 2 observations".to_string(),
            ));
        }

        let smoother = DoubleExponentialSmoothing::fit(self.alpha, self.beta, values)?;
        let level = smoother.level()?;
        let trend = smoother.trend()?;
        debug!(alpha = self.alpha, beta = self.beta, level, trend, "fitted holt");

        Ok(TrainedHoltLinear {
            name: self.name.clone(),
            level,
            trend,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltLinear {
    /// Final smoothed level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Final smoothed trend, added once per forecast step
    pub fn trend(&self) -> f64 {
        self.trend
    }
}

impl TrainedForecastModel for TrainedHoltLinear {
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|step| self.level + step as f64 * self.trend)
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
