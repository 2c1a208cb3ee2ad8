//! Autoregressive sequence strategy
//!
//! Predicts the next value from the previous `lookback` values with a linear
//! autoregression fitted by ridge least squares on a scaled copy of the
//! series, then rolls the forecast forward one step at a time.

use super::{fallback_forecast, strategy_points, ForecastStrategy};
use crate::models::ForecastPoint;
use ledger_math::linalg::ridge_least_squares;
use ledger_math::statistics::population_std_dev;
use ledger_math::{MathError, Result};
use tracing::{debug, warn};

const NAME: &str = "sequence";
const LOOKBACK: usize = 3;
const RIDGE: f64 = 1e-3;

#[derive(Debug, Clone)]
struct SequenceFit {
    /// Intercept followed by one coefficient per lag, most recent lag first
    coefficients: Vec<f64>,
    scale: f64,
    residual_std: f64,
}

impl SequenceFit {
    fn step(&self, history: &[f64]) -> f64 {
        let n = history.len();
        let scaled: f64 = self.coefficients[0]
            + (1..=LOOKBACK)
                .map(|lag| self.coefficients[lag] * history[n - lag] / self.scale)
                .sum::<f64>();
        scaled * self.scale
    }
}

/// Lagged autoregression standing in for a recurrent sequence model
#[derive(Debug, Clone)]
pub struct SequenceStrategy {
    available: bool,
    fitted: Option<SequenceFit>,
}

impl Default for SequenceStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceStrategy {
    /// Strategy backed by the `sequence-model` feature
    pub fn new() -> Self {
        Self {
            available: cfg!(feature = "sequence-model"),
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

    /// Smallest history the strategy will fit: two regression rows past the lookback
    pub fn min_history() -> usize {
        LOOKBACK + 2
    }

    fn fit(values: &[f64]) -> Result<SequenceFit> {
        if values.len() < Self::min_history() {
            return Err(MathError::InsufficientData(format!(
                "Sequence model needs at least {} observations",
                Self::min_history()
            )));
        }

        let scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();

        let mut rows = Vec::with_capacity(scaled.len() - LOOKBACK);
        let mut targets = Vec::with_capacity(scaled.len() - LOOKBACK);
        for t in LOOKBACK..scaled.len() {
            let mut row = Vec::with_capacity(LOOKBACK + 1);
            row.push(1.0);
            row.extend((1..=LOOKBACK).map(|lag| scaled[t - lag]));
            rows.push(row);
            targets.push(scaled[t]);
        }

        let coefficients = ridge_least_squares(&rows, &targets, RIDGE)?;

        let residuals: Vec<f64> = rows
            .iter()
            .zip(&targets)
            .map(|(row, y)| {
                let fitted: f64 = row.iter().zip(&coefficients).map(|(x, c)| x * c).sum();
                (y - fitted) * scale
            })
            .collect();

        debug!(?coefficients, scale, "fitted sequence model");

        Ok(SequenceFit {
            coefficients,
            scale,
            residual_std: population_std_dev(&residuals),
        })
    }
}

impl ForecastStrategy for SequenceStrategy {
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
                warn!(error = %err, "sequence model could not be trained");
                self.fitted = None;
            }
        }
    }

    fn predict(&self, values: &[f64], periods: usize) -> Vec<ForecastPoint> {
        if !self.available || values.len() < LOOKBACK {
            return fallback_forecast(NAME, values, periods);
        }

        let fit = match &self.fitted {
            Some(fit) => fit.clone(),
            None => match Self::fit(values) {
                Ok(fit) => fit,
                Err(_) => return fallback_forecast(NAME, values, periods),
            },
        };

        let mut history = values.to_vec();
        let mut predictions = Vec::with_capacity(periods);
        for _ in 0..periods {
            let next = fit.step(&history).max(0.0);
            predictions.push(next);
            history.push(next);
        }

        strategy_points(NAME, &predictions, fit.residual_std)
    }
}
