//! Multiplicative seasonal model on top of Holt's trend
//!
//! Each position in a 12-month cycle gets an index equal to the average of
//! the observations at that position divided by the overall mean. The
//! forecast is the Holt forecast scaled by the index of the cycle position
//! being forecast.

use crate::error::{ForecastError, Result};
use crate::models::exponential_smoothing::{HoltLinear, TrainedHoltLinear};
use crate::models::{ForecastModel, TrainedForecastModel};
use ledger_math::statistics::mean;
use tracing::debug;

/// Length of the seasonal cycle in months
pub const SEASON_LENGTH: usize = 12;

/// Holt trend with a 12-month multiplicative seasonal index
#[derive(Debug, Clone)]
pub struct SeasonalHolt {
    /// Name of the model
    name: String,
    /// Holt model supplying the level and trend
    base: HoltLinear,
}

/// Trained seasonal model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalHolt {
    /// Name of the model
    name: String,
    /// Trained Holt base
    base: TrainedHoltLinear,
    /// One multiplicative index per cycle position
    indices: Vec<f64>,
    /// Length of the training history, used to align forecast positions
    observations: usize,
}

impl SeasonalHolt {
    /// Create a seasonal model over the given Holt base
    pub fn new(base: HoltLinear) -> Self {
        Self {
            name: "seasonal".to_string(),
            base,
        }
    }
}

impl Default for SeasonalHolt {
    fn default() -> Self {
        Self::new(HoltLinear::default())
    }
}

/// Seasonal index per cycle position; all ones when the overall mean is zero
pub fn seasonal_indices(values: &[f64], season_length: usize) -> Vec<f64> {
    let overall = mean(values);
    if overall == 0.0 || season_length == 0 {
        return vec![1.0; season_length];
    }

    (0..season_length)
        .map(|position| {
            let at_position: Vec<f64> = values
                .iter()
                .skip(position)
                .step_by(season_length)
                .copied()
                .collect();
            if at_position.is_empty() {
                1.0
            } else {
                mean(&at_position) / overall
            }
        })
        .collect()
}

impl ForecastModel for SeasonalHolt {
    type Trained = TrainedSeasonalHolt;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        if values.len() < SEASON_LENGTH {
            return Err(ForecastError::DataError(format!(
                "Seasonal model needs at least {} observations, got {}",
                SEASON_LENGTH,
                values.len()
            )));
        }

        let base = self.base.train(values)?;
        let indices = seasonal_indices(values, SEASON_LENGTH);
        debug!(?indices, "fitted seasonal indices");

        Ok(TrainedSeasonalHolt {
            name: self.name.clone(),
            base,
            indices,
            observations: values.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalHolt {
    /// Seasonal indices, position 0 being the first observation's month
    pub fn indices(&self) -> &[f64] {
        &self.indices
    }
}

impl TrainedForecastModel for TrainedSeasonalHolt {
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        self.base
            .forecast(horizon)
            .into_iter()
            .enumerate()
            .map(|(i, base)| {
                let position = (self.observations + i) % SEASON_LENGTH;
                (base * self.indices[position]).max(0.0)
            })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
