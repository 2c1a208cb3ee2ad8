//! Ordinary least squares over (index, value) pairs
//!
//! The x axis is the position in the series (`0, 1, 2, ...`), which is how
//! monthly series are fitted throughout the engine.

use crate::{MathError, Result};

/// A fitted straight line `value = intercept + slope * index`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    n: usize,
}

impl LinearFit {
    /// Fit a least-squares line to the values, using their positions as x
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for linear regression. Need at least 2 points.".to_string(),
            ));
        }

        let n = values.len() as f64;

        // Calculate means
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let y_pred = intercept + slope * i as f64;
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - y_pred).powi(2);
        }

        // A flat series is explained perfectly by a flat line
        let r_squared = if ss_total.abs() < 1e-10 {
            1.0
        } else {
            1.0 - ss_residual / ss_total
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            n: values.len(),
        })
    }

    /// Slope per period (trend direction and strength)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Fitted value at index 0
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of determination of the fit on its own training data
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Number of observations the line was fitted on
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false; a fit needs at least two points
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Fitted value at an arbitrary index
    pub fn value_at(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }

    /// Extrapolate `steps_ahead` periods past the last observation (1 = next period)
    pub fn forecast(&self, steps_ahead: usize) -> f64 {
        self.value_at((self.n + steps_ahead - 1) as f64)
    }

    /// Residuals `value - fitted` for the given training values
    pub fn residuals(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &y)| y - self.value_at(i as f64))
            .collect()
    }
}
