//! Cash-flow projection from revenue and expense forecasts
//!
//! Revenue forecasts become inflows, expense forecasts outflows, and the
//! running balance starts from an opening balance. Ledger categories map to
//! cash-flow sections through a closed enum, so adding a category forces a
//! decision about where it belongs.

use crate::config::CashFlowConfig;
use crate::data::Period;
use crate::models::ForecastPoint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Section of a cash-flow statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowCategory {
    Operating,
    Investing,
    Financing,
}

/// Ledger account categories known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCategory {
    Sales,
    Services,
    InterestIncome,
    Revenue,
    Payroll,
    Rent,
    Utilities,
    Marketing,
    Supplies,
    Taxes,
    Equipment,
    Property,
    Investments,
    LoanProceeds,
    LoanRepayment,
    OwnerContribution,
    Dividends,
    Other,
}

impl LedgerCategory {
    /// Map a free-form category name; unknown names become [`LedgerCategory::Other`].
    ///
    /// Case is ignored and `_`/`-` are treated as spaces.
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '_' | '-' => ' ',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "sales" => LedgerCategory::Sales,
            "services" => LedgerCategory::Services,
            "interest income" => LedgerCategory::InterestIncome,
            "revenue" => LedgerCategory::Revenue,
            "payroll" => LedgerCategory::Payroll,
            "rent" => LedgerCategory::Rent,
            "utilities" => LedgerCategory::Utilities,
            "marketing" => LedgerCategory::Marketing,
            "supplies" => LedgerCategory::Supplies,
            "taxes" => LedgerCategory::Taxes,
            "equipment" => LedgerCategory::Equipment,
            "property" => LedgerCategory::Property,
            "investments" => LedgerCategory::Investments,
            "loan proceeds" => LedgerCategory::LoanProceeds,
            "loan repayment" => LedgerCategory::LoanRepayment,
            "owner contribution" => LedgerCategory::OwnerContribution,
            "dividends" => LedgerCategory::Dividends,
            _ => LedgerCategory::Other,
        }
    }

    /// Whether money booked here is income
    pub fn is_income(&self) -> bool {
        matches!(
            self,
            LedgerCategory::Sales
                | LedgerCategory::Services
                | LedgerCategory::InterestIncome
                | LedgerCategory::Revenue
        )
    }

    /// Cash-flow statement section for this category
    pub fn cash_flow_category(&self) -> CashFlowCategory {
        match self {
            LedgerCategory::Sales
            | LedgerCategory::Services
            | LedgerCategory::InterestIncome
            | LedgerCategory::Revenue
            | LedgerCategory::Payroll
            | LedgerCategory::Rent
            | LedgerCategory::Utilities
            | LedgerCategory::Marketing
            | LedgerCategory::Supplies
            | LedgerCategory::Taxes
            | LedgerCategory::Other => CashFlowCategory::Operating,
            LedgerCategory::Equipment | LedgerCategory::Property | LedgerCategory::Investments => {
                CashFlowCategory::Investing
            }
            LedgerCategory::LoanProceeds
            | LedgerCategory::LoanRepayment
            | LedgerCategory::OwnerContribution
            | LedgerCategory::Dividends => CashFlowCategory::Financing,
        }
    }
}

/// How the jitter generator is seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterSeeding {
    /// One generator seeded once for the whole projection
    #[default]
    SingleStream,
    /// A fresh generator seeded with `seed + step` at every step, matching
    /// projections produced by earlier releases
    PerStep,
}

/// Months of cash left at a given burn rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Runway {
    /// Net flow is zero or positive; cash never runs out
    Infinite,
    Months(f64),
}

/// Months until `balance` reaches zero at a constant monthly net flow
pub fn runway(balance: f64, monthly_net: f64) -> Runway {
    if monthly_net >= 0.0 {
        return Runway::Infinite;
    }
    Runway::Months(balance.max(0.0) / -monthly_net)
}

/// One projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPoint {
    pub step: usize,
    pub period: Option<Period>,
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
    /// Balance at the end of the month
    pub balance: f64,
}

/// A complete projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub opening_balance: f64,
    pub points: Vec<CashFlowPoint>,
}

impl CashFlowProjection {
    pub fn closing_balance(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.balance)
            .unwrap_or(self.opening_balance)
    }

    /// Average monthly net flow, 0 for an empty projection
    pub fn average_net(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.net).sum::<f64>() / self.points.len() as f64
    }

    /// Runway from the opening balance at the average projected net flow
    pub fn runway(&self) -> Runway {
        runway(self.opening_balance, self.average_net())
    }

    /// First projected month whose closing balance is negative
    pub fn first_shortfall(&self) -> Option<&CashFlowPoint> {
        self.points.iter().find(|p| p.balance < 0.0)
    }
}

/// Merges revenue and expense forecasts into a running balance
#[derive(Debug, Clone, Default)]
pub struct CashFlowProjector {
    config: CashFlowConfig,
}

impl CashFlowProjector {
    pub fn new(config: CashFlowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CashFlowConfig {
        &self.config
    }

    /// Project month by month. A shorter forecast is padded with zero flow.
    pub fn project(&self, revenue: &[ForecastPoint], expenses: &[ForecastPoint]) -> CashFlowProjection {
        let steps = revenue.len().max(expenses.len());
        let jitter_percent = if self.config.jitter && self.config.jitter_percent.is_finite() {
            self.config.jitter_percent.abs()
        } else {
            0.0
        };
        let jitter = Uniform::new_inclusive(-jitter_percent, jitter_percent);
        let mut stream = StdRng::seed_from_u64(self.config.seed);

        let mut balance = self.config.opening_balance;
        let mut points = Vec::with_capacity(steps);

        for i in 0..steps {
            let step = i + 1;
            let mut inflow = revenue.get(i).map(|p| p.predicted_value).unwrap_or(0.0);
            let mut outflow = expenses.get(i).map(|p| p.predicted_value).unwrap_or(0.0);

            if self.config.jitter {
                let (in_factor, out_factor) = match self.config.seeding {
                    JitterSeeding::SingleStream => {
                        (jitter.sample(&mut stream), jitter.sample(&mut stream))
                    }
                    JitterSeeding::PerStep => {
                        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(step as u64));
                        (jitter.sample(&mut rng), jitter.sample(&mut rng))
                    }
                };
                inflow *= 1.0 + in_factor;
                outflow *= 1.0 + out_factor;
            }

            let net = inflow - outflow;
            balance += net;

            let period = revenue
                .get(i)
                .and_then(|p| p.period)
                .or_else(|| expenses.get(i).and_then(|p| p.period));

            points.push(CashFlowPoint {
                step,
                period,
                inflow,
                outflow,
                net,
                balance,
            });
        }

        let projection = CashFlowProjection {
            opening_balance: self.config.opening_balance,
            points,
        };
        info!(
            months = steps,
            closing_balance = projection.closing_balance(),
            "cash-flow projection complete"
        );
        projection
    }
}
