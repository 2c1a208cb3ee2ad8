//! Monthly series handling for forecasting
//!
//! The engine consumes one metric at a time (revenue or expenses) as an
//! ascending sequence of calendar months with one amount each. This module
//! owns that shape: the [`Period`] label, the validated [`MonthlySeries`],
//! and loading plus monthly aggregation of dated ledger amounts.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// A calendar month, e.g. `2024-03`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating that the month is in `1..=12` and the
    /// year is one chrono can represent
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ForecastError::InvalidParameter(format!(
                "Year {} is out of range",
                year
            )));
        }
        Ok(Self { year, month })
    }

    /// The month a date falls in
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month; December rolls into January of the next year
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The `n` months following this one, in order
    pub fn following(&self, n: usize) -> Vec<Period> {
        std::iter::successors(Some(self.succ()), |p| Some(p.succ()))
            .take(n)
            .collect()
    }

    /// Signed number of months from `earlier` to this period
    pub fn months_since(&self, earlier: &Period) -> i64 {
        (i64::from(self.year) - i64::from(earlier.year)) * 12 + i64::from(self.month)
            - i64::from(earlier.month)
    }

    /// First day of the month, `None` if the year is outside chrono's range
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = ForecastError;

    /// Accepts `YYYY-MM` or a full `YYYY-MM-DD` date
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split('-').count() {
            3 => {
                let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
                Ok(Self::from_date(date))
            }
            2 => {
                let (year, month) = s
                    .split_once('-')
                    .ok_or_else(|| ForecastError::ParseError(format!("Invalid period: {}", s)))?;
                Self::new(year.parse()?, month.parse()?)
            }
            _ => Err(ForecastError::ParseError(format!(
                "Invalid period '{}', expected YYYY-MM or YYYY-MM-DD",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// One observation of a monthly metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: Period,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(period: Period, value: f64) -> Self {
        Self { period, value }
    }
}

/// An ascending, duplicate-free sequence of monthly observations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySeries {
    points: Vec<SeriesPoint>,
}

impl MonthlySeries {
    /// Create a series, rejecting unordered or duplicate periods and non-finite values
    pub fn new(points: Vec<SeriesPoint>) -> Result<Self> {
        if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Value for {} is not a finite number",
                bad.period
            )));
        }

        for pair in points.windows(2) {
            if pair[1].period <= pair[0].period {
                return Err(ForecastError::DataError(format!(
                    "Periods must be strictly ascending: {} follows {}",
                    pair[1].period, pair[0].period
                )));
            }
        }

        Ok(Self { points })
    }

    /// Consecutive months starting at `start`, one per value
    pub fn from_values(start: Period, values: &[f64]) -> Result<Self> {
        let periods = std::iter::successors(Some(start), |p| Some(p.succ()));
        let points = periods
            .zip(values)
            .map(|(period, &value)| SeriesPoint::new(period, value))
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// The observed amounts in chronological order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn periods(&self) -> Vec<Period> {
        self.points.iter().map(|p| p.period).collect()
    }

    pub fn first_period(&self) -> Option<Period> {
        self.points.first().map(|p| p.period)
    }

    pub fn last_period(&self) -> Option<Period> {
        self.points.last().map(|p| p.period)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Longest gap-filled history an aggregation will build
pub const MAX_SPAN_MONTHS: i64 = 100 * 12;

/// Sum dated amounts into calendar months.
///
/// Months between the first and last observed month that have no entries
/// are filled with zero so the result has no gaps. Entries spanning more than
/// [`MAX_SPAN_MONTHS`] are rejected.
pub fn aggregate_monthly(entries: &[(NaiveDate, f64)]) -> Result<MonthlySeries> {
    aggregate_periods(
        entries
            .iter()
            .map(|&(date, amount)| (Period::from_date(date), amount)),
    )
}

fn aggregate_periods<I>(entries: I) -> Result<MonthlySeries>
where
    I: IntoIterator<Item = (Period, f64)>,
{
    let mut totals: BTreeMap<Period, f64> = BTreeMap::new();
    for (period, amount) in entries {
        if !amount.is_finite() {
            return Err(ForecastError::DataError(format!(
                "Amount for {} is not a finite number",
                period
            )));
        }
        *totals.entry(period).or_insert(0.0) += amount;
    }

    let (first, last) = match (totals.keys().next(), totals.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(MonthlySeries::default()),
    };

    let span = last.months_since(&first) + 1;
    if span > MAX_SPAN_MONTHS {
        return Err(ForecastError::DataError(format!(
            "Entries from {} to {} span {} months, more than the {} allowed",
            first, last, span, MAX_SPAN_MONTHS
        )));
    }

    let mut points = Vec::with_capacity(span as usize);
    let mut current = first;
    while current <= last {
        let value = totals.get(&current).copied().unwrap_or(0.0);
        points.push(SeriesPoint::new(current, value));
        current = current.succ();
    }

    debug!(
        months = points.len(),
        first = %first,
        last = %last,
        "aggregated ledger amounts into monthly series"
    );

    MonthlySeries::new(points)
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    date: String,
    amount: f64,
}

/// Data loader for ledger exports
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a monthly series from a CSV file with `date,amount` columns.
    ///
    /// `date` may be a full `YYYY-MM-DD` date or a `YYYY-MM` month. Rows are
    /// summed per month.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<MonthlySeries> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Same as [`DataLoader::from_csv`], reading from any source
    pub fn from_reader<R: Read>(reader: R) -> Result<MonthlySeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for row in csv_reader.deserialize::<LedgerRow>() {
            let row = row?;
            entries.push((row.date.parse::<Period>()?, row.amount));
        }

        aggregate_periods(entries)
    }
}
