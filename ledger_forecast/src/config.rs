//! Configuration surface of the engine
//!
//! Everything here is forgiving: unknown method names fall back to
//! exponential smoothing and missing fields take their defaults, so a
//! partially filled config file still yields a usable setup.

use crate::cashflow::JitterSeeding;
use crate::ensemble::EnsembleWeights;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Forecasting method selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ForecastMethod {
    /// Simple exponential smoothing (flat forecast)
    #[default]
    ExponentialSmoothing,
    /// Mean of the last three observations
    MovingAverage,
    /// Least-squares trend line
    LinearRegression,
    /// Holt trend scaled by a 12-month multiplicative seasonal index
    Seasonal,
    /// Fixed-weight blend of the other methods
    Ensemble,
}

impl ForecastMethod {
    /// All recognized methods
    pub const ALL: [ForecastMethod; 5] = [
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::MovingAverage,
        ForecastMethod::LinearRegression,
        ForecastMethod::Seasonal,
        ForecastMethod::Ensemble,
    ];

    /// Map a method name to a method. Unrecognized names map to exponential smoothing.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "exponential_smoothing" => ForecastMethod::ExponentialSmoothing,
            "moving_average" => ForecastMethod::MovingAverage,
            "linear_regression" => ForecastMethod::LinearRegression,
            "seasonal" => ForecastMethod::Seasonal,
            "ensemble" => ForecastMethod::Ensemble,
            other => {
                warn!(method = other, "unknown forecast method, using exponential_smoothing");
                ForecastMethod::ExponentialSmoothing
            }
        }
    }

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::ExponentialSmoothing => "exponential_smoothing",
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::LinearRegression => "linear_regression",
            ForecastMethod::Seasonal => "seasonal",
            ForecastMethod::Ensemble => "ensemble",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for ForecastMethod {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ForecastMethod> for String {
    fn from(method: ForecastMethod) -> Self {
        method.as_str().to_string()
    }
}

/// Settings for the cash-flow projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowConfig {
    /// Cash on hand before the first projected month
    pub opening_balance: f64,
    /// Apply bounded random jitter to projected inflows and outflows
    pub jitter: bool,
    /// Maximum relative jitter, e.g. `0.05` for ±5%
    pub jitter_percent: f64,
    /// Seed for the jitter generator
    pub seed: u64,
    /// How the jitter generator is seeded across steps
    pub seeding: JitterSeeding,
}

impl Default for CashFlowConfig {
    fn default() -> Self {
        Self {
            opening_balance: 0.0,
            jitter: false,
            jitter_percent: 0.05,
            seed: 42,
            seeding: JitterSeeding::SingleStream,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Method used by the series forecaster
    pub method: ForecastMethod,
    /// Number of months to forecast
    pub periods: usize,
    /// Trailing months held out by the accuracy evaluator
    pub test_periods: usize,
    /// Starting weights of the model ensemble
    pub ensemble_weights: EnsembleWeights,
    /// Cash-flow projection settings
    pub cash_flow: CashFlowConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            method: ForecastMethod::ExponentialSmoothing,
            periods: 6,
            test_periods: 3,
            ensemble_weights: EnsembleWeights::default(),
            cash_flow: CashFlowConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Load a config from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize the config as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Correct out-of-range values to the nearest usable ones
    pub fn normalized(mut self) -> Self {
        if self.periods == 0 {
            warn!("forecast periods must be at least 1, using 1");
            self.periods = 1;
        }
        if self.test_periods == 0 {
            warn!("test periods must be at least 1, using 1");
            self.test_periods = 1;
        }
        if !(self.cash_flow.jitter_percent.is_finite() && self.cash_flow.jitter_percent >= 0.0) {
            warn!(
                jitter_percent = self.cash_flow.jitter_percent,
                "invalid jitter percent, using 0.05"
            );
            self.cash_flow.jitter_percent = 0.05;
        }
        self.ensemble_weights = self.ensemble_weights.normalized();
        self
    }
}
