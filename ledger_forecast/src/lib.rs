//! # Ledger Forecast
//!
//! Forecasting and forecast evaluation for short monthly financial series
//! such as revenue and expenses.
//!
//! ## Features
//!
//! - Five forecasting methods (exponential smoothing, moving average, linear
//!   regression, Holt-based seasonal, fixed-weight blend) with 95% bands
//! - Trend classification, growth rate and quarterly seasonality detection
//! - Hold-out accuracy evaluation (MAE, MAPE, RMSE, R²)
//! - A weighted ensemble of sequence, structural and boosted-tree strategies
//!   that degrade to labelled low-confidence fallbacks
//! - Budget variance per category and cash-flow projection with runway
//!
//! Nothing in the forecasting path returns an error: short histories, zero
//! denominators and unknown method names all resolve to documented
//! fallbacks. Only loading and parsing at the boundary can fail.
//!
//! ## Quick Start
//!
//! ```rust
//! use ledger_forecast::{ForecastMethod, SeriesForecaster, TrendAnalyzer};
//!
//! let revenue = vec![100.0, 110.0, 120.0, 130.0];
//!
//! let forecaster = SeriesForecaster::new();
//! let points = forecaster.forecast(&revenue, 2, ForecastMethod::MovingAverage);
//! assert_eq!(points.len(), 2);
//! assert!((points[0].predicted_value - 120.0).abs() < 1e-9);
//!
//! let report = TrendAnalyzer::new().analyze(&revenue);
//! assert!((report.growth_rate_percent - 30.0).abs() < 1e-9);
//! ```

pub mod budget;
pub mod cashflow;
pub mod config;
pub mod data;
pub mod ensemble;
pub mod error;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod trend;

// Re-export commonly used types
pub use crate::budget::{BudgetSummary, BudgetVarianceAnalyzer, BudgetVarianceEntry, LedgerEntry};
pub use crate::cashflow::{
    runway, CashFlowCategory, CashFlowPoint, CashFlowProjection, CashFlowProjector, JitterSeeding,
    LedgerCategory, Runway,
};
pub use crate::config::{CashFlowConfig, ForecastConfig, ForecastMethod};
pub use crate::data::{aggregate_monthly, DataLoader, MonthlySeries, Period, SeriesPoint};
pub use crate::ensemble::{EnsembleAdapter, EnsembleWeights, ForecastStrategy, ModelPredictions};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::SeriesForecaster;
pub use crate::metrics::{AccuracyEvaluator, AccuracyReport};
pub use crate::models::ForecastPoint;
pub use crate::trend::{SeasonalityReport, TrendAnalyzer, TrendDirection, TrendReport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
