//! Budget versus actual comparison per category

use crate::cashflow::LedgerCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Whether a budget category is income: sales, services, interest income or revenue.
///
/// Matching ignores case and treats `_` and `-` as spaces, so
/// `Interest_Income` is income. Everything else is an expense.
pub fn is_income_category(category: &str) -> bool {
    LedgerCategory::from_name(category).is_income()
}

/// A dated, categorized ledger amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
}

/// Sum entries per category for dates in `from..=to`
pub fn actuals_by_category(entries: &[LedgerEntry], from: NaiveDate, to: NaiveDate) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.date >= from && e.date <= to) {
        *totals.entry(entry.category.clone()).or_insert(0.0) += entry.amount;
    }
    totals
}

/// Planned versus actual amount for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetVarianceEntry {
    pub category: String,
    pub budgeted: f64,
    pub actual: f64,
    /// `actual - budgeted`
    pub variance: f64,
    /// Variance relative to budget in percent; 0 when nothing was budgeted
    pub variance_percent: f64,
    /// Income above budget, or expense below budget
    pub is_favorable: bool,
}

/// Totals over a set of variance entries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_budgeted: f64,
    pub total_actual: f64,
    pub total_variance: f64,
    pub favorable_count: usize,
    pub unfavorable_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetVarianceAnalyzer;

impl BudgetVarianceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// One entry per budgeted category, ordered by category name.
    ///
    /// Categories without actuals count as an actual of 0; actuals without
    /// a budget are ignored.
    pub fn analyze(
        &self,
        budget: &BTreeMap<String, f64>,
        actual_by_category: &BTreeMap<String, f64>,
    ) -> Vec<BudgetVarianceEntry> {
        budget
            .iter()
            .map(|(category, &budgeted)| {
                let actual = actual_by_category.get(category).copied().unwrap_or(0.0);
                Self::entry(category, budgeted, actual)
            })
            .collect()
    }

    fn entry(category: &str, budgeted: f64, actual: f64) -> BudgetVarianceEntry {
        let variance = actual - budgeted;
        let variance_percent = if budgeted == 0.0 {
            0.0
        } else {
            variance / budgeted * 100.0
        };
        let is_favorable = if is_income_category(category) {
            variance > 0.0
        } else {
            variance < 0.0
        };

        debug!(category, budgeted, actual, variance, is_favorable, "budget variance");

        BudgetVarianceEntry {
            category: category.to_string(),
            budgeted,
            actual,
            variance,
            variance_percent,
            is_favorable,
        }
    }

    /// Totals and favorable/unfavorable counts
    pub fn summarize(&self, entries: &[BudgetVarianceEntry]) -> BudgetSummary {
        entries.iter().fold(BudgetSummary::default(), |mut summary, entry| {
            summary.total_budgeted += entry.budgeted;
            summary.total_actual += entry.actual;
            summary.total_variance += entry.variance;
            if entry.is_favorable {
                summary.favorable_count += 1;
            } else {
                summary.unfavorable_count += 1;
            }
            summary
        })
    }
}
