//! Gradient-boosted regression stumps on lag features
//!
//! Features for the value at position `t` are the three previous values and
//! `t` itself. Each boosting round fits a single-split tree to the current
//! residuals; forecasts are produced recursively, feeding each prediction
//! back in as a lag.

use super::{fallback_forecast, strategy_points, ForecastStrategy};
use crate::models::ForecastPoint;
use ledger_math::statistics::{mean, population_std_dev};
use ledger_math::{MathError, Result};
use tracing::{debug, warn};

const NAME: &str = "boosted_trees";
const LAGS: usize = 3;
const ROUNDS: usize = 50;
const LEARNING_RATE: f64 = 0.1;
const MIN_HISTORY: usize = LAGS + 3;

/// A depth-1 regression tree
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stump {
    feature: usize,
    threshold: f64,
    left: f64,
    right: f64,
}

impl Stump {
    fn predict(&self, features: &[f64]) -> f64 {
        if features[self.feature] <= self.threshold {
            self.left
        } else {
            self.right
        }
    }

    /// Best single split of `targets` over any feature by squared error
    fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Self {
        let overall = mean(targets);
        let mut best = Stump {
            feature: 0,
            threshold: f64::INFINITY,
            left: overall,
            right: overall,
        };
        let mut best_sse: f64 = targets.iter().map(|t| (t - overall).powi(2)).sum();

        let width = rows.first().map(Vec::len).unwrap_or(0);
        for feature in 0..width {
            let mut order: Vec<usize> = (0..rows.len()).collect();
            order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

            let total: f64 = targets.iter().sum();
            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            let total_sq: f64 = targets.iter().map(|t| t * t).sum();

            for split in 1..order.len() {
                let moved = targets[order[split - 1]];
                left_sum += moved;
                left_sq += moved * moved;

                let below = rows[order[split - 1]][feature];
                let above = rows[order[split]][feature];
                if below == above {
                    continue;
                }

                let left_n = split as f64;
                let right_n = (order.len() - split) as f64;
                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;

                let sse = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);

                if sse < best_sse {
                    best_sse = sse;
                    best = Stump {
                        feature,
                        threshold: (below + above) / 2.0,
                        left: left_sum / left_n,
                        right: right_sum / right_n,
                    };
                }
            }
        }

        best
    }
}

#[derive(Debug, Clone)]
struct BoostedFit {
    base: f64,
    stumps: Vec<Stump>,
    residual_std: f64,
}

impl BoostedFit {
    fn predict(&self, features: &[f64]) -> f64 {
        self.base
            + self
                .stumps
                .iter()
                .map(|stump| LEARNING_RATE * stump.predict(features))
                .sum::<f64>()
    }
}

fn features(history: &[f64], t: usize) -> Vec<f64> {
    let mut row: Vec<f64> = (1..=LAGS).map(|lag| history[t - lag]).collect();
    row.push(t as f64);
    row
}

/// Gradient-boosted trees standing in for an external boosting library
#[derive(Debug, Clone)]
pub struct BoostedTreeStrategy {
    available: bool,
    fitted: Option<BoostedFit>,
}

impl Default for BoostedTreeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BoostedTreeStrategy {
    /// Strategy backed by the `boosted-model` feature
    pub fn new() -> Self {
        Self {
            available: cfg!(feature = "boosted-model"),
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

    fn fit(values: &[f64]) -> Result<BoostedFit> {
        if values.len() < MIN_HISTORY {
            return Err(MathError::InsufficientData(format!(
                "Boosted model needs at least {} observations",
                MIN_HISTORY
            )));
        }

        let rows: Vec<Vec<f64>> = (LAGS..values.len()).map(|t| features(values, t)).collect();
        let targets = &values[LAGS..];

        let base = mean(targets);
        let mut fitted = vec![base; targets.len()];
        let mut stumps = Vec::with_capacity(ROUNDS);

        for _ in 0..ROUNDS {
            let residuals: Vec<f64> = targets.iter().zip(&fitted).map(|(y, f)| y - f).collect();
            let stump = Stump::fit(&rows, &residuals);
            for (f, row) in fitted.iter_mut().zip(&rows) {
                *f += LEARNING_RATE * stump.predict(row);
            }
            stumps.push(stump);
        }

        let residuals: Vec<f64> = targets.iter().zip(&fitted).map(|(y, f)| y - f).collect();
        let residual_std = population_std_dev(&residuals);
        debug!(rounds = stumps.len(), residual_std, "fitted boosted trees");

        Ok(BoostedFit {
            base,
            stumps,
            residual_std,
        })
    }
}

impl ForecastStrategy for BoostedTreeStrategy {
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
                warn!(error = %err, "boosted model could not be trained");
                self.fitted = None;
            }
        }
    }

    fn predict(&self, values: &[f64], periods: usize) -> Vec<ForecastPoint> {
        if !self.available || values.len() < LAGS {
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
            let t = history.len();
            let next = fit.predict(&features(&history, t)).max(0.0);
            predictions.push(next);
            history.push(next);
        }

        strategy_points(NAME, &predictions, fit.residual_std)
    }
}
