//! Least-squares trend line model

use crate::error::Result;
use crate::models::{ForecastModel, TrainedForecastModel};
use ledger_math::LinearFit;
use tracing::debug;

/// Linear trend over the observation index
#[derive(Debug, Clone)]
pub struct LinearTrend {
    /// Name of the model
    name: String,
}

/// Trained linear trend
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    /// Name of the model
    name: String,
    /// Least-squares line over indices `0..n`
    fit: LinearFit,
}

impl LinearTrend {
    /// Create a new linear trend model
    pub fn new() -> Self {
        Self {
            name: "linear_regression".to_string(),
        }
    }
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let fit = LinearFit::fit(values)?;
        debug!(
            slope = fit.slope(),
            intercept = fit.intercept(),
            r_squared = fit.r_squared(),
            "fitted linear trend"
        );

        Ok(TrainedLinearTrend {
            name: self.name.clone(),
            fit,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinearTrend {
    /// The fitted line
    pub fn fit(&self) -> &LinearFit {
        &self.fit
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        // Monetary amounts: a falling trend bottoms out at zero
        (1..=horizon)
            .map(|step| self.fit.forecast(step).max(0.0))
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
