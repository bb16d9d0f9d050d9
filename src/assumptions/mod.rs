//! Rate, tax and drawdown assumptions driving a projection

mod tax;
pub mod loader;

pub use tax::{AssetBase, Box3Assessment, Box3Assumptions, Box3Regime, IncomeBase, TaxRegime};
pub use loader::{load_params, load_params_csv, load_params_json, ParamMap};

use crate::config::PlannerConfig;

/// Growth, yield and inflation rates, all annual decimals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateAssumptions {
    pub equity_growth: f64,
    pub equity_dividend_yield: f64,
    pub bond_coupon: f64,
    pub property_net_yield: f64,
    pub cash_rate: f64,
    pub inflation: f64,
}

/// Scheduled annual withdrawal, inflation-indexed once it starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownSchedule {
    /// Withdrawal in the start year
    pub annual_amount: f64,
    /// First calendar year with a withdrawal
    pub start_year: i32,
}

impl DrawdownSchedule {
    /// Drawdown for `year` given last year's drawdown.
    ///
    /// Indexation compounds on the previous year's value, so years must be
    /// evaluated in sequence. Without a previous year the prior drawdown
    /// counts as zero.
    pub fn amount_for(&self, year: i32, prior_drawdown: Option<f64>, inflation: f64) -> f64 {
        if year == self.start_year {
            self.annual_amount
        } else if year > self.start_year {
            prior_drawdown.unwrap_or(0.0) * (1.0 + inflation)
        } else {
            0.0
        }
    }
}

/// Container for all projection assumptions
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    pub rates: RateAssumptions,
    pub box3: Box3Assumptions,
    pub drawdown: DrawdownSchedule,
    /// Share of positive net cash flow moved into equity; the rest stays in cash
    pub reinvestment_fraction: f64,
}

impl Assumptions {
    /// Assumptions matching the planner's built-in defaults
    pub fn default_planning() -> Self {
        PlannerConfig::default().assumptions()
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_planning()
    }
}
