//! Starting balances for the four asset classes

/// Opening position of the household at the planning start year.
///
/// Balances are whole currency units, as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portfolio {
    /// Equity holdings
    pub equity: i64,
    /// Bond holdings
    pub bonds: i64,
    /// Property value
    pub property: i64,
    /// Cash balance
    pub cash: i64,
}

impl Portfolio {
    pub fn new(equity: i64, bonds: i64, property: i64, cash: i64) -> Self {
        Self {
            equity,
            bonds,
            property,
            cash,
        }
    }

    /// Sum of all four balances.
    ///
    /// Summed as floats, like every downstream figure, so any balances fit.
    pub fn total(&self) -> f64 {
        self.equity as f64 + self.bonds as f64 + self.property as f64 + self.cash as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        let portfolio = Portfolio::new(2_000_000, 1_100_000, 1_800_000, 0);
        assert_eq!(portfolio.total(), 4_900_000.0);
    }

    #[test]
    fn test_total_of_huge_balances_does_not_overflow() {
        let portfolio = Portfolio::new(i64::MAX, i64::MAX, i64::MAX, i64::MAX);
        let total = portfolio.total();
        assert!(total.is_finite());
        assert!(total > i64::MAX as f64);
    }
}
