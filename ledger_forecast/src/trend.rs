//! Trend direction, growth and seasonality detection
//!
//! These run on the raw history and are independent of any forecast.

use ledger_math::statistics::{argmax, argmin, mean, population_std_dev, population_variance};
use ledger_math::LinearFit;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum observations to classify a trend
pub const MIN_TREND_POINTS: usize = 3;
/// Minimum observations to look for seasonality
pub const MIN_SEASONALITY_POINTS: usize = 12;
/// Number of seasonal buckets (quarters)
pub const SEASONAL_BUCKETS: usize = 4;
/// Slope threshold relative to the mean
pub const TREND_THRESHOLD: f64 = 0.02;
/// Bucket spread threshold relative to the mean
pub const SEASONALITY_THRESHOLD: f64 = 0.1;

/// Direction of a fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

/// Summary of a series' trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub direction: TrendDirection,
    /// Percent change from the first to the last observation
    pub growth_rate_percent: f64,
    pub average: f64,
    /// Population standard deviation
    pub volatility: f64,
}

/// Result of seasonality detection
///
/// The peak, low and bucket fields are only filled when `detected` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityReport {
    pub detected: bool,
    /// 1-indexed bucket with the highest average
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_period: Option<usize>,
    /// 1-indexed bucket with the lowest average
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_period: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_averages: Option<Vec<f64>>,
}

impl SeasonalityReport {
    fn not_detected() -> Self {
        Self {
            detected: false,
            peak_period: None,
            low_period: None,
            bucket_averages: None,
        }
    }
}

/// Stateless trend and seasonality analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classify the direction of a least-squares line through the values.
    ///
    /// The slope must exceed 2% of the mean in either direction to count as
    /// a trend.
    pub fn classify_trend(&self, values: &[f64]) -> TrendDirection {
        if values.len() < MIN_TREND_POINTS {
            return TrendDirection::InsufficientData;
        }

        let slope = match LinearFit::fit(values) {
            Ok(fit) => fit.slope(),
            Err(_) => return TrendDirection::InsufficientData,
        };
        let threshold = TREND_THRESHOLD * mean(values);

        debug!(slope, threshold, "classifying trend");

        if slope > threshold {
            TrendDirection::Increasing
        } else if slope < -threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    /// Percent change between first and last value; 0 unless the first value is positive
    pub fn growth_rate(&self, values: &[f64]) -> f64 {
        match (values.first(), values.last()) {
            (Some(&first), Some(&last)) if first > 0.0 => (last - first) / first * 100.0,
            _ => 0.0,
        }
    }

    /// Look for a quarterly pattern by bucketing observations on `index % 4`.
    ///
    /// Seasonality is reported when the variance of the bucket means exceeds
    /// `(0.1 * mean)^2`.
    pub fn detect_seasonality(&self, values: &[f64]) -> SeasonalityReport {
        if values.len() < MIN_SEASONALITY_POINTS {
            return SeasonalityReport::not_detected();
        }

        let bucket_averages: Vec<f64> = (0..SEASONAL_BUCKETS)
            .map(|bucket| {
                let members: Vec<f64> = values
                    .iter()
                    .skip(bucket)
                    .step_by(SEASONAL_BUCKETS)
                    .copied()
                    .collect();
                mean(&members)
            })
            .collect();

        let spread = population_variance(&bucket_averages);
        let threshold = (SEASONALITY_THRESHOLD * mean(values)).powi(2);
        debug!(spread, threshold, ?bucket_averages, "checking seasonality");

        if spread <= threshold {
            return SeasonalityReport::not_detected();
        }

        SeasonalityReport {
            detected: true,
            peak_period: argmax(&bucket_averages).map(|i| i + 1),
            low_period: argmin(&bucket_averages).map(|i| i + 1),
            bucket_averages: Some(bucket_averages),
        }
    }

    /// Direction, growth, average and volatility in one report
    pub fn analyze(&self, values: &[f64]) -> TrendReport {
        TrendReport {
            direction: self.classify_trend(values),
            growth_rate_percent: self.growth_rate(values),
            average: mean(values),
            volatility: population_std_dev(values),
        }
    }
}
