//! Core projection engine: a yearly forward recurrence over the ledger

use crate::assumptions::{AssetBase, Assumptions, IncomeBase};
use crate::portfolio::Portfolio;
use super::records::{ProjectionResult, YearRecord};
use super::state::OpeningBalances;

/// Horizon of a projection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Calendar year of the first record
    pub start_year: i32,
    /// Number of years to project; zero or negative yields no records
    pub horizon_years: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            start_year: 2026,
            horizon_years: 10,
        }
    }
}

impl ProjectionConfig {
    /// Calendar years covered, in order.
    ///
    /// Saturates at `i32::MAX`; validated configs never reach it.
    pub fn years(&self) -> std::ops::Range<i32> {
        let horizon = self.horizon_years.max(0);
        self.start_year..self.start_year.saturating_add(horizon)
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    /// Run the projection for a portfolio.
    ///
    /// Inputs are not validated; pathological values flow straight through.
    pub fn project(&self, portfolio: &Portfolio) -> ProjectionResult {
        let years = self.config.years();
        let mut result = ProjectionResult::with_capacity(years.len());

        log::info!(
            "Projecting {} year(s) from {} (opening total {:.0})",
            years.len(),
            self.config.start_year,
            portfolio.total()
        );

        for year in years {
            let row = self.calculate_year(year, portfolio, result.last());
            log::debug!(
                "{}: regime={} tax={:.2} net_cashflow={:.2} total_value={:.2}",
                row.year,
                row.box3_regime,
                row.box3_tax,
                row.cashflow_total,
                row.total_value
            );
            result.push(row);
        }

        if let Some(last) = result.last() {
            log::info!("Projection complete: {} total value {:.2}", last.year, last.total_value);
        }

        result
    }

    /// Calculate one year from the previous year's record.
    ///
    /// `prior` is `None` for the first projection year; every other year must
    /// be given the record for the year directly before it.
    pub fn calculate_year(
        &self,
        year: i32,
        portfolio: &Portfolio,
        prior: Option<&YearRecord>,
    ) -> YearRecord {
        let rates = &self.assumptions.rates;
        let opening =
            OpeningBalances::for_year(portfolio, prior, self.assumptions.reinvestment_fraction);

        // Income on this year's opening balances
        let income_equity_growth = opening.equity * rates.equity_growth;
        let income_equity_dividend = opening.equity * rates.equity_dividend_yield;
        let income_bonds_coupon = opening.bonds * rates.bond_coupon;
        let income_interest_on_cash = opening.cash * rates.cash_rate;

        // Rent is set once from the property value, then indexed on itself
        let income_rentals = match prior {
            None => opening.property * rates.property_net_yield,
            Some(prior) => prior.income_rentals * (1.0 + rates.inflation),
        };

        let assessment = self.assumptions.box3.assess(
            year,
            &AssetBase {
                equity: opening.equity,
                bonds: opening.bonds,
                property: opening.property,
                cash: opening.cash,
            },
            &IncomeBase {
                equity_growth: income_equity_growth,
                equity_dividend: income_equity_dividend,
                bond_coupon: income_bonds_coupon,
                rentals: income_rentals,
                cash_interest: income_interest_on_cash,
            },
        );

        let cashflow_drawdown = self.assumptions.drawdown.amount_for(
            year,
            prior.map(|p| p.cashflow_drawdown),
            rates.inflation,
        );

        // Growth is unrealised and stays out of the cash flow
        let cashflow_total = income_equity_dividend
            + income_bonds_coupon
            + income_rentals
            + income_interest_on_cash
            - cashflow_drawdown
            - assessment.tax;

        let total_value = opening.total()
            + income_equity_growth
            + income_equity_dividend
            + income_bonds_coupon
            + income_rentals
            + income_interest_on_cash
            - assessment.tax
            - cashflow_drawdown;

        YearRecord {
            year,
            start_equity: opening.equity,
            start_bonds: opening.bonds,
            start_property: opening.property,
            start_cash: opening.cash,
            income_equity_growth,
            income_equity_dividend,
            income_bonds_coupon,
            income_rentals,
            income_interest_on_cash,
            box3_regime: assessment.regime,
            box3_income: assessment.taxable_income,
            box3_tax: assessment.tax,
            cashflow_equity_dividend: income_equity_dividend,
            cashflow_bonds_coupon: income_bonds_coupon,
            cashflow_rentals: income_rentals,
            cashflow_interest_on_cash: income_interest_on_cash,
            cashflow_drawdown,
            cashflow_box3_tax: assessment.tax,
            cashflow_total,
            total_value,
        }
    }
}
