//! # Ledger Math
//!
//! Numeric building blocks for short monthly financial series.
//! This crate has no notion of periods, categories or forecasts; it only
//! provides the statistics, least-squares fits and smoothing recurrences the
//! forecasting engine is assembled from.

use thiserror::Error;

pub mod linalg;
pub mod regression;
pub mod smoothing;
pub mod statistics;

pub use regression::LinearFit;
pub use smoothing::{DoubleExponentialSmoothing, ExponentialSmoothing};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
