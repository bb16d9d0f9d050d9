//! Per-year ledger rows and the assembled projection

use serde::Serialize;
use std::io::Write;

use crate::assumptions::TaxRegime;
use crate::error::PlannerError;

/// Output column names, in the order records serialize
pub const COLUMN_NAMES: [&str; 21] = [
    "Year",
    "start_Equity",
    "start_Bonds",
    "start_Property",
    "start_Cash",
    "income_Equity_Growth",
    "income_Equity_Dividend",
    "income_Bonds_Coupon",
    "income_Rentals",
    "income_Interest_on_Cash",
    "box3_Old_or_New",
    "box3_Income",
    "box3_Tax",
    "cashflow_Equity_Dividend",
    "cashflow_Bonds_Coupon",
    "cashflow_Rentals",
    "cashflow_Interest_on_Cash",
    "cashflow_Drawdown",
    "cashflow_Box3_Tax",
    "cashflow_Total",
    "Total_Value",
];

/// One simulated calendar year. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRecord {
    /// Calendar year
    #[serde(rename = "Year")]
    pub year: i32,

    // Opening balances
    /// Equity at the start of the year
    #[serde(rename = "start_Equity")]
    pub start_equity: f64,
    /// Bonds at the start of the year
    #[serde(rename = "start_Bonds")]
    pub start_bonds: f64,
    /// Property at the start of the year
    #[serde(rename = "start_Property")]
    pub start_property: f64,
    /// Cash at the start of the year
    #[serde(rename = "start_Cash")]
    pub start_cash: f64,

    // Income
    /// Price growth on opening equity
    #[serde(rename = "income_Equity_Growth")]
    pub income_equity_growth: f64,
    /// Dividend on opening equity
    #[serde(rename = "income_Equity_Dividend")]
    pub income_equity_dividend: f64,
    /// Coupon on opening bonds
    #[serde(rename = "income_Bonds_Coupon")]
    pub income_bonds_coupon: f64,
    /// Net rent, indexed with inflation after the first year
    #[serde(rename = "income_Rentals")]
    pub income_rentals: f64,
    /// Interest on opening cash
    #[serde(rename = "income_Interest_on_Cash")]
    pub income_interest_on_cash: f64,

    // Box 3
    /// Regime in force this year
    #[serde(rename = "box3_Old_or_New")]
    pub box3_regime: TaxRegime,
    /// Taxable Box 3 income, may be negative
    #[serde(rename = "box3_Income")]
    pub box3_income: f64,
    /// Box 3 tax, never negative
    #[serde(rename = "box3_Tax")]
    pub box3_tax: f64,

    // Cash flows
    /// Dividend received in cash
    #[serde(rename = "cashflow_Equity_Dividend")]
    pub cashflow_equity_dividend: f64,
    /// Coupon received in cash
    #[serde(rename = "cashflow_Bonds_Coupon")]
    pub cashflow_bonds_coupon: f64,
    /// Rent received in cash
    #[serde(rename = "cashflow_Rentals")]
    pub cashflow_rentals: f64,
    /// Interest received in cash
    #[serde(rename = "cashflow_Interest_on_Cash")]
    pub cashflow_interest_on_cash: f64,
    /// Withdrawal this year, subtracted from the net cash flow
    #[serde(rename = "cashflow_Drawdown")]
    pub cashflow_drawdown: f64,
    /// Box 3 tax paid this year, subtracted from the net cash flow
    #[serde(rename = "cashflow_Box3_Tax")]
    pub cashflow_box3_tax: f64,
    /// Net cash flow: income received minus drawdown minus tax
    #[serde(rename = "cashflow_Total")]
    pub cashflow_total: f64,

    /// Opening balances plus this year's income, minus tax and drawdown.
    /// Not a reconciled closing balance.
    #[serde(rename = "Total_Value")]
    pub total_value: f64,
}

/// Complete projection: one record per year, in calendar order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    /// Records in calendar order
    pub years: Vec<YearRecord>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self { years: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            years: Vec::with_capacity(capacity),
        }
    }

    /// Append the next year. Records only ever grow at the end.
    pub fn push(&mut self, record: YearRecord) {
        debug_assert!(
            self.years.last().map_or(true, |last| record.year == last.year + 1),
            "years must be appended in sequence"
        );
        self.years.push(record);
    }

    /// Most recent year, i.e. the prior year for the next computation
    pub fn last(&self) -> Option<&YearRecord> {
        self.years.last()
    }

    /// Record for a calendar year
    pub fn get(&self, year: i32) -> Option<&YearRecord> {
        let first = self.years.first()?.year;
        let idx = usize::try_from(year.checked_sub(first)?).ok()?;
        self.years.get(idx)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YearRecord> {
        self.years.iter()
    }

    pub fn into_records(self) -> Vec<YearRecord> {
        self.years
    }

    /// Write the ledger as CSV with the standard column header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), PlannerError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.years.is_empty() {
            csv_writer.write_record(COLUMN_NAMES)?;
        }
        for record in &self.years {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// JSON array of records, one object per year
    pub fn to_json(&self) -> Result<String, PlannerError> {
        Ok(serde_json::to_string(&self.years)?)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            total_years: self.years.len() as u32,
            first_year: self.years.first().map(|r| r.year),
            last_year: self.years.last().map(|r| r.year),
            total_tax: self.years.iter().map(|r| r.box3_tax).sum(),
            total_drawdown: self.years.iter().map(|r| r.cashflow_drawdown).sum(),
            total_net_cashflow: self.years.iter().map(|r| r.cashflow_total).sum(),
            final_total_value: self.years.last().map(|r| r.total_value).unwrap_or(0.0),
        }
    }
}

impl Default for ProjectionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ProjectionResult {
    type Item = &'a YearRecord;
    type IntoIter = std::slice::Iter<'a, YearRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.years.iter()
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub total_tax: f64,
    pub total_drawdown: f64,
    pub total_net_cashflow: f64,
    pub final_total_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32) -> YearRecord {
        YearRecord {
            year,
            start_equity: 100.0,
            start_bonds: 50.0,
            start_property: 25.0,
            start_cash: 5.0,
            income_equity_growth: 6.5,
            income_equity_dividend: 1.0,
            income_bonds_coupon: 2.0,
            income_rentals: 3.0,
            income_interest_on_cash: 0.5,
            box3_regime: TaxRegime::Old,
            box3_income: 4.0,
            box3_tax: 1.5,
            cashflow_equity_dividend: 1.0,
            cashflow_bonds_coupon: 2.0,
            cashflow_rentals: 3.0,
            cashflow_interest_on_cash: 0.5,
            cashflow_drawdown: 2.0,
            cashflow_box3_tax: 1.5,
            cashflow_total: 3.0,
            total_value: 189.0,
        }
    }

    fn result() -> ProjectionResult {
        let mut result = ProjectionResult::new();
        result.push(record(2026));
        result.push(record(2027));
        result
    }

    #[test]
    fn test_json_uses_column_names_in_order() {
        let json = serde_json::to_string(&record(2026)).unwrap();
        let mut last = 0;
        for name in COLUMN_NAMES {
            let pos = json
                .find(&format!("\"{}\":", name))
                .unwrap_or_else(|| panic!("missing column {}", name));
            assert!(pos >= last, "column {} out of order", name);
            last = pos;
        }
        assert!(json.contains("\"box3_Old_or_New\":\"Old\""));
    }

    #[test]
    fn test_csv_header_matches_columns() {
        let mut buf = Vec::new();
        result().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), COLUMN_NAMES.join(","));
        let first = lines.next().unwrap();
        assert!(first.starts_with("2026,100.0,50.0,"));
        assert!(first.contains(",Old,"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_empty_csv_still_has_header() {
        let mut buf = Vec::new();
        ProjectionResult::new().write_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), COLUMN_NAMES.join(","));
    }

    #[test]
    fn test_lookup_by_year() {
        let result = result();
        assert_eq!(result.get(2027).map(|r| r.year), Some(2027));
        assert!(result.get(2025).is_none());
        assert!(result.get(2028).is_none());
        assert!(ProjectionResult::new().get(2026).is_none());
    }

    #[test]
    fn test_summary() {
        let summary = result().summary();
        assert_eq!(summary.total_years, 2);
        assert_eq!(summary.first_year, Some(2026));
        assert_eq!(summary.last_year, Some(2027));
        assert_eq!(summary.total_tax, 3.0);
        assert_eq!(summary.total_drawdown, 4.0);
        assert_eq!(summary.total_net_cashflow, 6.0);
        assert_eq!(summary.final_total_value, 189.0);

        let empty = ProjectionResult::new().summary();
        assert_eq!(empty.total_years, 0);
        assert_eq!(empty.last_year, None);
    }
}
