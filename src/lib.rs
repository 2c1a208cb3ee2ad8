//! # Ledger Forecast Workspace
//!
//! Umbrella crate over the workspace members:
//!
//! - [`ledger_math`]: statistics, least squares and smoothing primitives
//! - [`ledger_forecast`]: the forecasting, evaluation and analysis engine
//!
//! ## Example
//!
//! ```
//! use ledger_forecast_workspace::forecast::{ForecastMethod, SeriesForecaster};
//!
//! let expenses = [40.0, 42.0];
//! let points = SeriesForecaster::new().forecast(&expenses, 3, ForecastMethod::Seasonal);
//!
//! // Too little history: flat forecast at the mean with confidence 0.5
//! assert!(points.iter().all(|p| p.confidence == 0.5 && p.predicted_value == 41.0));
//! ```

pub use ledger_forecast as forecast;
pub use ledger_math as math;
