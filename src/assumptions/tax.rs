//! Simplified Box 3 wealth tax with an old and a new regime

use serde::Serialize;
use std::fmt;

/// Which Box 3 regime applies in a given calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaxRegime {
    /// Deemed-return regime on the asset base
    Old,
    /// Regime taxing actual income and growth
    New,
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxRegime::Old => write!(f, "Old"),
            TaxRegime::New => write!(f, "New"),
        }
    }
}

/// Parameters of one regime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3Regime {
    /// Deemed return on cash
    pub return_on_cash: f64,
    /// Deemed return on equity, bonds and property
    pub return_on_other: f64,
    /// Flat tax rate applied to taxable income
    pub rate: f64,
    /// Exemption threshold subtracted before the rate is applied
    pub exemption: f64,
}

impl Box3Regime {
    /// Tax on a taxable amount, floored at zero (no rebates)
    pub fn tax_on(&self, taxable: f64) -> f64 {
        (taxable * self.rate).max(0.0)
    }
}

/// Asset base the old regime taxes, taken from opening balances
#[derive(Debug, Clone, Copy)]
pub struct AssetBase {
    pub equity: f64,
    pub bonds: f64,
    pub property: f64,
    pub cash: f64,
}

/// Income lines the new regime taxes
#[derive(Debug, Clone, Copy)]
pub struct IncomeBase {
    pub equity_growth: f64,
    pub equity_dividend: f64,
    pub bond_coupon: f64,
    pub rentals: f64,
    pub cash_interest: f64,
}

impl IncomeBase {
    pub fn total(&self) -> f64 {
        self.equity_growth
            + self.equity_dividend
            + self.bond_coupon
            + self.rentals
            + self.cash_interest
    }
}

/// Result of the Box 3 calculation for one year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3Assessment {
    pub regime: TaxRegime,
    pub taxable_income: f64,
    pub tax: f64,
}

/// Both regimes plus the year the new one takes over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3Assumptions {
    pub current: Box3Regime,
    pub future: Box3Regime,
    /// First calendar year taxed under the new regime
    pub new_start_year: i32,
}

impl Box3Assumptions {
    /// Regime in force for `year`. The switch year itself is already New.
    pub fn regime_for(&self, year: i32) -> TaxRegime {
        if year < self.new_start_year {
            TaxRegime::Old
        } else {
            TaxRegime::New
        }
    }

    /// Taxable income and tax for `year`.
    ///
    /// Old: deemed return on (equity + bonds + property - exemption) plus the
    /// deemed cash return on the full cash balance.
    /// New: actual income lines minus the exemption.
    pub fn assess(&self, year: i32, assets: &AssetBase, income: &IncomeBase) -> Box3Assessment {
        let regime = self.regime_for(year);
        let (params, taxable_income) = match regime {
            TaxRegime::Old => {
                let other = assets.equity + assets.bonds + assets.property - self.current.exemption;
                let taxable = other * self.current.return_on_other
                    + self.current.return_on_cash * assets.cash;
                (&self.current, taxable)
            }
            TaxRegime::New => (&self.future, income.total() - self.future.exemption),
        };

        Box3Assessment {
            regime,
            taxable_income,
            tax: params.tax_on(taxable_income),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn box3() -> Box3Assumptions {
        Box3Assumptions {
            current: Box3Regime {
                return_on_cash: 0.015,
                return_on_other: 0.06,
                rate: 0.36,
                exemption: 104_000.0,
            },
            future: Box3Regime {
                return_on_cash: 0.0,
                return_on_other: 0.0,
                rate: 0.36,
                exemption: 5_000.0,
            },
            new_start_year: 2028,
        }
    }

    fn assets() -> AssetBase {
        AssetBase {
            equity: 2_000_000.0,
            bonds: 1_100_000.0,
            property: 1_800_000.0,
            cash: 10_000.0,
        }
    }

    fn income() -> IncomeBase {
        IncomeBase {
            equity_growth: 130_000.0,
            equity_dividend: 0.0,
            bond_coupon: 71_500.0,
            rentals: 158_400.0,
            cash_interest: 125.0,
        }
    }

    #[test]
    fn test_switch_year_is_new() {
        let b = box3();
        assert_eq!(b.regime_for(2027), TaxRegime::Old);
        assert_eq!(b.regime_for(2028), TaxRegime::New);
        assert_eq!(b.regime_for(2040), TaxRegime::New);
    }

    #[test]
    fn test_old_regime_formula() {
        let a = box3().assess(2027, &assets(), &income());
        let expected = (4_900_000.0 - 104_000.0) * 0.06 + 0.015 * 10_000.0;
        assert_eq!(a.regime, TaxRegime::Old);
        assert_relative_eq!(a.taxable_income, expected, epsilon = 1e-9);
        assert_relative_eq!(a.tax, expected * 0.36, epsilon = 1e-9);
    }

    #[test]
    fn test_new_regime_formula() {
        let a = box3().assess(2028, &assets(), &income());
        let expected = 130_000.0 + 71_500.0 + 158_400.0 + 125.0 - 5_000.0;
        assert_eq!(a.regime, TaxRegime::New);
        assert_relative_eq!(a.taxable_income, expected, epsilon = 1e-9);
        assert_relative_eq!(a.tax, expected * 0.36, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_taxable_income_is_not_refunded() {
        let mut b = box3();
        b.future.exemption = 10_000_000.0;
        let a = b.assess(2030, &assets(), &income());
        assert!(a.taxable_income < 0.0);
        assert_eq!(a.tax, 0.0);
    }

    #[test]
    fn test_regime_label() {
        assert_eq!(TaxRegime::Old.to_string(), "Old");
        assert_eq!(serde_json::to_string(&TaxRegime::New).unwrap(), "\"New\"");
    }
}
