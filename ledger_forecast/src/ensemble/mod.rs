//! Ensemble of heavier forecasting strategies
//!
//! Three strategies sit behind one [`ForecastStrategy`] contract: an
//! autoregressive sequence model, a structural trend-plus-season model and a
//! gradient-boosted tree model. Each is compiled in behind a cargo feature
//! and reports at construction whether it is usable. An unusable or
//! untrainable strategy still answers `predict`, with a flat `mean ± 1.96σ`
//! forecast at confidence 0.5 labelled `<name>_fallback`.
//!
//! [`EnsembleAdapter`] blends the three outputs with an [`EnsembleWeights`]
//! snapshot. Re-weighting produces a new snapshot; nothing is mutated in
//! place, so one adapter can be shared between threads for forecasting.

use crate::models::{ForecastPoint, Z_95};
use ledger_math::statistics::{mean, mean_absolute_difference, population_std_dev};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, warn};

pub mod boosted;
pub mod sequence;
pub mod structural;

pub use boosted::BoostedTreeStrategy;
pub use sequence::SequenceStrategy;
pub use structural::StructuralStrategy;

/// Confidence reported by a trained, available strategy
pub const STRATEGY_CONFIDENCE: f64 = 0.8;
/// Confidence reported by a fallback forecast
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// A forecasting strategy that may depend on an optional model backend
pub trait ForecastStrategy: Debug + Send + Sync {
    /// Model name used to tag forecast points
    fn name(&self) -> &str;

    /// Whether the backend was compiled in and enabled at construction
    fn is_available(&self) -> bool;

    /// Fit on a history. Never fails; a strategy that cannot fit keeps
    /// answering with its fallback.
    fn train(&mut self, values: &[f64]);

    /// Forecast `periods` steps past the end of `values`
    fn predict(&self, values: &[f64], periods: usize) -> Vec<ForecastPoint>;
}

/// Flat `mean ± 1.96σ` forecast used when a strategy cannot model the series
pub fn fallback_forecast(name: &str, values: &[f64], periods: usize) -> Vec<ForecastPoint> {
    let level = mean(values);
    let half_width = Z_95 * population_std_dev(values);
    let model = format!("{}_fallback", name);

    (1..=periods)
        .map(|step| ForecastPoint::new(step, level, half_width, FALLBACK_CONFIDENCE, model.as_str()))
        .collect()
}

/// Wrap raw predictions of a fitted strategy into forecast points
pub(crate) fn strategy_points(name: &str, predictions: &[f64], residual_std: f64) -> Vec<ForecastPoint> {
    predictions
        .iter()
        .enumerate()
        .map(|(i, &predicted)| {
            ForecastPoint::new(i + 1, predicted, Z_95 * residual_std, STRATEGY_CONFIDENCE, name)
        })
        .collect()
}

/// Blend weights of the three strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    pub sequence: f64,
    pub structural: f64,
    pub boosted: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            sequence: 0.35,
            structural: 0.35,
            boosted: 0.30,
        }
    }
}

impl EnsembleWeights {
    pub fn new(sequence: f64, structural: f64, boosted: f64) -> Self {
        Self {
            sequence,
            structural,
            boosted,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.sequence, self.structural, self.boosted]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Rescale to sum to 1. Negative, non-finite or all-zero weights reset to the defaults.
    pub fn normalized(&self) -> Self {
        let weights = self.as_array();
        let total = self.sum();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || total <= 0.0 {
            return Self::default();
        }
        Self::new(weights[0] / total, weights[1] / total, weights[2] / total)
    }

    /// Weights inversely proportional to each model's mean absolute error.
    ///
    /// A model with zero error is weighted as if its error were 1. A model
    /// whose error is infinite, NaN or negative gets no weight. `None` when
    /// no model has a usable error.
    pub fn try_from_errors(errors: [f64; 3]) -> Option<Self> {
        let inverse = errors.map(|e| {
            if e == 0.0 {
                1.0
            } else if e.is_finite() && e > 0.0 {
                1.0 / e
            } else {
                0.0
            }
        });
        if inverse.iter().sum::<f64>() <= 0.0 {
            return None;
        }
        Some(Self::new(inverse[0], inverse[1], inverse[2]).normalized())
    }

    /// Same as [`EnsembleWeights::try_from_errors`], falling back to the
    /// default weights when no error is usable
    pub fn from_errors(errors: [f64; 3]) -> Self {
        Self::try_from_errors(errors).unwrap_or_default()
    }
}

/// Per-strategy predictions over one horizon, used to re-weight the ensemble
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPredictions {
    pub sequence: Vec<f64>,
    pub structural: Vec<f64>,
    pub boosted: Vec<f64>,
}

impl ModelPredictions {
    /// Collect predicted values from the three component forecasts
    pub fn from_components(components: &[Vec<ForecastPoint>; 3]) -> Self {
        let values = |points: &Vec<ForecastPoint>| -> Vec<f64> {
            points.iter().map(|p| p.predicted_value).collect()
        };
        Self {
            sequence: values(&components[0]),
            structural: values(&components[1]),
            boosted: values(&components[2]),
        }
    }
}

/// Weighted blend of a sequence, a structural and a boosted-tree strategy
#[derive(Debug)]
pub struct EnsembleAdapter {
    sequence: Box<dyn ForecastStrategy>,
    structural: Box<dyn ForecastStrategy>,
    boosted: Box<dyn ForecastStrategy>,
    weights: EnsembleWeights,
}

impl Default for EnsembleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EnsembleAdapter {
    /// Adapter over the native strategies with default weights
    pub fn new() -> Self {
        Self::with_strategies(
            Box::new(SequenceStrategy::new()),
            Box::new(StructuralStrategy::new()),
            Box::new(BoostedTreeStrategy::new()),
        )
    }

    /// Adapter over caller-supplied strategies
    pub fn with_strategies(
        sequence: Box<dyn ForecastStrategy>,
        structural: Box<dyn ForecastStrategy>,
        boosted: Box<dyn ForecastStrategy>,
    ) -> Self {
        Self {
            sequence,
            structural,
            boosted,
            weights: EnsembleWeights::default(),
        }
    }

    /// Replace the weight snapshot; weights are normalized to sum to 1
    pub fn with_weights(mut self, weights: EnsembleWeights) -> Self {
        self.weights = weights.normalized();
        self
    }

    /// Current weight snapshot
    pub fn weights(&self) -> EnsembleWeights {
        self.weights
    }

    /// Availability of the sequence, structural and boosted strategies
    pub fn availability(&self) -> [bool; 3] {
        [
            self.sequence.is_available(),
            self.structural.is_available(),
            self.boosted.is_available(),
        ]
    }

    /// Train all three strategies on the same history
    pub fn train(&mut self, values: &[f64]) {
        self.sequence.train(values);
        self.structural.train(values);
        self.boosted.train(values);
    }

    /// Forecasts of the sequence, structural and boosted strategies, in that order
    pub fn component_forecasts(&self, values: &[f64], periods: usize) -> [Vec<ForecastPoint>; 3] {
        [
            self.sequence.predict(values, periods),
            self.structural.predict(values, periods),
            self.boosted.predict(values, periods),
        ]
    }

    /// Blended forecast.
    ///
    /// Each period's prediction is the weighted sum of the three component
    /// predictions, its interval spans the lowest lower bound to the highest
    /// upper bound, and its confidence is the mean component confidence.
    pub fn forecast(&self, values: &[f64], periods: usize) -> Vec<ForecastPoint> {
        let periods = periods.max(1);
        let components = self.component_forecasts(values, periods);
        self.combine(&components)
    }

    /// Blend already computed component forecasts
    pub fn combine(&self, components: &[Vec<ForecastPoint>; 3]) -> Vec<ForecastPoint> {
        let weights = self.weights.as_array();
        let horizon = components.iter().map(Vec::len).min().unwrap_or(0);

        (0..horizon)
            .map(|i| {
                let at_step = [&components[0][i], &components[1][i], &components[2][i]];

                let predicted: f64 = at_step
                    .iter()
                    .zip(weights)
                    .map(|(point, weight)| weight * point.predicted_value)
                    .sum();
                let lower = at_step
                    .iter()
                    .map(|p| p.lower_bound)
                    .fold(f64::INFINITY, f64::min);
                let upper = at_step
                    .iter()
                    .map(|p| p.upper_bound)
                    .fold(f64::NEG_INFINITY, f64::max);
                let confidence = at_step.iter().map(|p| p.confidence).sum::<f64>() / 3.0;

                ForecastPoint {
                    step: i + 1,
                    period: at_step[0].period,
                    predicted_value: predicted,
                    lower_bound: lower.min(predicted),
                    upper_bound: upper.max(predicted),
                    confidence,
                    model: "ensemble".to_string(),
                }
            })
            .collect()
    }

    /// Weights inversely proportional to each strategy's mean absolute error
    /// against `actual` over the same horizon.
    ///
    /// Returns a new snapshot; install it with [`EnsembleAdapter::with_weights`].
    /// With nothing to compare, or no finite error, the current weights are
    /// returned unchanged.
    pub fn update_weights(&self, actual: &[f64], predictions: &ModelPredictions) -> EnsembleWeights {
        if actual.is_empty() {
            return self.weights;
        }

        let errors = [
            mean_absolute_difference(actual, &predictions.sequence),
            mean_absolute_difference(actual, &predictions.structural),
            mean_absolute_difference(actual, &predictions.boosted),
        ];
        match EnsembleWeights::try_from_errors(errors) {
            Some(weights) => {
                debug!(?errors, ?weights, "recomputed ensemble weights");
                weights
            }
            None => {
                warn!(?errors, "no usable model errors, keeping current weights");
                self.weights
            }
        }
    }
}
