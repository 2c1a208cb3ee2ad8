//! Structural time-series strategy: linear trend plus additive yearly season

use super::{fallback_forecast, strategy_points, ForecastStrategy};
use crate::models::seasonal::SEASON_LENGTH;
use crate::models::ForecastPoint;
use ledger_math::statistics::{mean, population_std_dev};
use ledger_math::{LinearFit, MathError, Result};
use tracing::{debug, warn};

const NAME: &str = "structural";
const MIN_HISTORY: usize = 4;

#[derive(Debug, Clone)]
struct StructuralFit {
    trend: LinearFit,
    /// Additive effect per month of the cycle; absent below one full year
    season: Option<Vec<f64>>,
    residual_std: f64,
}

impl StructuralFit {
    fn value_at(&self, index: usize) -> f64 {
        let seasonal = self
            .season
            .as_ref()
            .map(|season| season[index % SEASON_LENGTH])
            .unwrap_or(0.0);
        self.trend.value_at(index as f64) + seasonal
    }
}

/// Trend-and-season decomposition standing in for a structural forecasting library
#[derive(Debug, Clone)]
pub struct StructuralStrategy {
    available: bool,
    fitted: Option<StructuralFit>,
}

impl Default for StructuralStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralStrategy {
    /// Strategy backed by the `structural-model` feature
    pub fn new() -> Self {
        Self {
            available: cfg!(feature = "structural-model"),
            fitted: None,
        }
    }

    /// Strategy that always answers with its fallback
    pub fn unavailable() -> Self {
        Self {
            available: false,
            fitted: None,
        }
    }

    fn fit(values: &[f64]) -> Result<StructuralFit> {
        if values.len() < MIN_HISTORY {
            return Err(MathError::InsufficientData(format!(
                "Structural model needs at least {} observations",
                MIN_HISTORY
            )));
        }

        let trend = LinearFit::fit(values)?;
        let detrended = trend.residuals(values);

        let season = (values.len() >= SEASON_LENGTH).then(|| {
            (0..SEASON_LENGTH)
                .map(|position| {
                    let at_position: Vec<f64> = detrended
                        .iter()
                        .skip(position)
                        .step_by(SEASON_LENGTH)
                        .copied()
                        .collect();
                    mean(&at_position)
                })
                .collect::<Vec<f64>>()
        });

        let mut fit = StructuralFit {
            trend,
            season,
            residual_std: 0.0,
        };
        let residuals: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(i, v)| v - fit.value_at(i))
            .collect();
        fit.residual_std = population_std_dev(&residuals);

        debug!(
            slope = fit.trend.slope(),
            seasonal = fit.season.is_some(),
            residual_std = fit.residual_std,
            "fitted structural model"
        );

        Ok(fit)
    }
}

impl ForecastStrategy for StructuralStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn train(&mut self, values: &[f64]) {
        if !self.available {
            return;
        }
        match Self::fit(values) {
            Ok(fit) => self.fitted = Some(fit),
            Err(err) => {
                warn!(error = %err, "structural model could not be trained");
                self.fitted = None;
            }
        }
    }

    fn predict(&self, values: &[f64], periods: usize) -> Vec<ForecastPoint> {
        if !self.available {
            return fallback_forecast(NAME, values, periods);
        }

        let fit = match &self.fitted {
            Some(fit) => fit.clone(),
            None => match Self::fit(values) {
                Ok(fit) => fit,
                Err(_) => return fallback_forecast(NAME, values, periods),
            },
        };

        let start = values.len();
        let predictions: Vec<f64> = (0..periods).map(|h| fit.value_at(start + h)).collect();

        strategy_points(NAME, &predictions, fit.residual_std)
    }
}
