//! Exponential smoothing recurrences
//!
//! Both smoothers are incremental: feed observations in chronological order
//! with `update`, or build one in a single call with `fit`.

use crate::{MathError, Result};

fn check_factor(name: &str, factor: f64) -> Result<()> {
    if !(factor > 0.0 && factor < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            name, factor
        )));
    }
    Ok(())
}

/// Simple exponential smoothing: `L = alpha * v + (1 - alpha) * L`
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
    observations: usize,
}

impl ExponentialSmoothing {
    /// Create an empty smoother with the given smoothing factor
    pub fn new(alpha: f64) -> Result<Self> {
        check_factor("Alpha", alpha)?;

        Ok(Self {
            alpha,
            level: None,
            observations: 0,
        })
    }

    /// Smooth a whole series; the first value seeds the level
    pub fn fit(alpha: f64, values: &[f64]) -> Result<Self> {
        let mut smoother = Self::new(alpha)?;
        for &value in values {
            smoother.update(value);
        }
        Ok(smoother)
    }

    /// Fold one more observation into the level
    pub fn update(&mut self, value: f64) {
        self.observations += 1;
        self.level = Some(match self.level {
            None => value,
            Some(level) => self.alpha * value + (1.0 - self.alpha) * level,
        });
    }

    /// Current level, which is also the forecast for every future period
    pub fn level(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("No data available for exponential smoothing".to_string())
        })
    }

    /// Smoothing factor
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of observations folded in so far
    pub fn observations(&self) -> usize {
        self.observations
    }
}

/// Double exponential smoothing (Holt's linear trend method)
///
/// The level is seeded with the first observation and the trend with the
/// difference between the first two; every later observation updates both:
///
/// ```text
/// level' = alpha * v + (1 - alpha) * (level + trend)
/// trend' = beta * (level' - level) + (1 - beta) * trend
/// ```
#[derive(Debug, Clone)]
pub struct DoubleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    level: Option<f64>,
    trend: Option<f64>,
    observations: usize,
}

impl DoubleExponentialSmoothing {
    /// Create an empty smoother with level factor `alpha` and trend factor `beta`
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        check_factor("Alpha", alpha)?;
        check_factor("Beta", beta)?;

        Ok(Self {
            alpha,
            beta,
            level: None,
            trend: None,
            observations: 0,
        })
    }

    /// Smooth a whole series
    pub fn fit(alpha: f64, beta: f64, values: &[f64]) -> Result<Self> {
        let mut smoother = Self::new(alpha, beta)?;
        for &value in values {
            smoother.update(value);
        }
        Ok(smoother)
    }

    /// Fold one more observation into level and trend
    pub fn update(&mut self, value: f64) {
        self.observations += 1;

        match (self.level, self.trend) {
            (None, _) => {
                self.level = Some(value);
            }
            (Some(first), None) => {
                // Second observation: seed the trend, then apply the recurrence
                let trend = value - first;
                self.apply(first, trend, value);
            }
            (Some(level), Some(trend)) => {
                self.apply(level, trend, value);
            }
        }
    }

    fn apply(&mut self, level: f64, trend: f64, value: f64) {
        let new_level = self.alpha * value + (1.0 - self.alpha) * (level + trend);
        let new_trend = self.beta * (new_level - level) + (1.0 - self.beta) * trend;
        self.level = Some(new_level);
        self.trend = Some(new_trend);
    }

    /// Current level
    pub fn level(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("Level not calculated yet".to_string())
        })
    }

    /// Current trend; zero while only one observation has been seen
    pub fn trend(&self) -> Result<f64> {
        match (self.level, self.trend) {
            (Some(_), Some(trend)) => Ok(trend),
            (Some(_), None) => Ok(0.0),
            _ => Err(MathError::InsufficientData(
                "Trend not calculated yet".to_string(),
            )),
        }
    }

    /// Forecast `h` steps ahead: `level + h * trend`
    pub fn forecast(&self, h: usize) -> Result<f64> {
        Ok(self.level()? + h as f64 * self.trend()?)
    }

    /// Number of observations folded in so far
    pub fn observations(&self) -> usize {
        self.observations
    }
}
