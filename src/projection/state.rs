//! Opening balances carried from one year into the next

use crate::portfolio::Portfolio;
use super::records::YearRecord;

/// Balances at the start of a projection year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningBalances {
    pub equity: f64,
    pub bonds: f64,
    pub property: f64,
    pub cash: f64,
}

impl OpeningBalances {
    /// First-year balances straight from the portfolio
    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        Self {
            equity: portfolio.equity as f64,
            bonds: portfolio.bonds as f64,
            property: portfolio.property as f64,
            cash: portfolio.cash as f64,
        }
    }

    /// Roll the previous year's opening balances forward.
    ///
    /// Equity grows by last year's growth plus the reinvested share of a
    /// strictly positive net cash flow. Cash takes the remainder of that
    /// surplus, or absorbs a shortfall in full. Bonds and property carry over
    /// unchanged: their yield is income only and never compounds into principal.
    pub fn roll_forward(prior: &YearRecord, reinvestment_fraction: f64) -> Self {
        let net = prior.cashflow_total;
        let (reinvested, retained, shortfall) = if net > 0.0 {
            (reinvestment_fraction * net, (1.0 - reinvestment_fraction) * net, 0.0)
        } else if net < 0.0 {
            (0.0, 0.0, net)
        } else {
            (0.0, 0.0, 0.0)
        };

        Self {
            equity: prior.start_equity + prior.income_equity_growth + reinvested,
            bonds: prior.start_bonds,
            property: prior.start_property,
            cash: prior.start_cash + retained + shortfall,
        }
    }

    /// Opening balances for a year: the portfolio for the first year,
    /// otherwise rolled from the prior record
    pub fn for_year(
        portfolio: &Portfolio,
        prior: Option<&YearRecord>,
        reinvestment_fraction: f64,
    ) -> Self {
        match prior {
            None => Self::from_portfolio(portfolio),
            Some(prior) => Self::roll_forward(prior, reinvestment_fraction),
        }
    }

    pub fn total(&self) -> f64 {
        self.equity + self.bonds + self.property + self.cash
    }
}
