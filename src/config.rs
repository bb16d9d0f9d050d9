//! Flat planner configuration with centralized defaults
//!
//! `PlannerConfig` is the external parameter set: one named field per
//! parameter, all with defaults. It is coerced from loosely-typed input
//! (request bodies, parameter files), validated once, and then split into
//! the typed pieces the engine consumes.

use serde_json::Value;

use crate::assumptions::{
    loader::json_kind, Assumptions, Box3Assumptions, Box3Regime, DrawdownSchedule, ParamMap,
    RateAssumptions,
};
use crate::error::PlannerError;
use crate::portfolio::Portfolio;
use crate::projection::ProjectionConfig;

/// Longest horizon accepted by [`PlannerConfig::validate`]
pub const MAX_HORIZON_YEARS: i32 = 500;

/// All recognised parameter names, in declaration order
pub const PARAMETER_NAMES: [&str; 22] = [
    "start_equity",
    "start_bonds",
    "start_property",
    "start_cash",
    "equity_growth_rate",
    "equity_dividend_yield",
    "bond_coupon",
    "property_net_yield",
    "cash_rate",
    "box3_return_on_cash_current",
    "box3_return_on_other_current",
    "box3_rate_current",
    "box3_exemption_current",
    "box3_rate_future",
    "box3_exemption_future",
    "box3_new_start_year",
    "excess_cash_reinvestment_in_equity",
    "inflation_rate",
    "planning_horizon_years",
    "planning_start_year",
    "drawdown_per_year",
    "drawdown_start_year",
];

/// Complete planner input
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Equity balance at the start of the first year
    pub start_equity: i64,
    /// Bond balance; carried unchanged through the horizon
    pub start_bonds: i64,
    /// Property value; carried unchanged through the horizon
    pub start_property: i64,
    /// Cash balance at the start of the first year
    pub start_cash: i64,

    /// Annual price growth on equity
    pub equity_growth_rate: f64,
    /// Annual dividend paid out on equity
    pub equity_dividend_yield: f64,
    /// Annual coupon on bonds
    pub bond_coupon: f64,
    /// Net rental yield on property, first year only; later years index with inflation
    pub property_net_yield: f64,
    /// Annual interest on cash
    pub cash_rate: f64,

    /// Old regime: deemed return on cash
    pub box3_return_on_cash_current: f64,
    /// Old regime: deemed return on equity, bonds and property
    pub box3_return_on_other_current: f64,
    /// Old regime: flat tax rate
    pub box3_rate_current: f64,
    /// Old regime: exemption subtracted from the non-cash asset base
    pub box3_exemption_current: i64,

    /// New regime: flat tax rate
    pub box3_rate_future: f64,
    /// New regime: exemption subtracted from total income
    pub box3_exemption_future: i64,
    /// First year taxed under the New regime
    pub box3_new_start_year: i32,

    /// Fraction of positive net cash flow reinvested into equity (0..=1)
    pub excess_cash_reinvestment_in_equity: f64,
    /// Annual inflation, indexing rent and drawdown
    pub inflation_rate: f64,

    /// Number of years to project
    pub planning_horizon_years: i32,
    /// Calendar year of the first record
    pub planning_start_year: i32,

    /// Withdrawal in the first drawdown year
    pub drawdown_per_year: i64,
    /// First calendar year with a withdrawal
    pub drawdown_start_year: i32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            start_equity: 2_000_000,
            start_bonds: 1_100_000,
            start_property: 1_800_000,
            start_cash: 0,
            equity_growth_rate: 0.065,
            equity_dividend_yield: 0.0,
            bond_coupon: 0.065,
            property_net_yield: 0.088,
            cash_rate: 0.0125,
            box3_return_on_cash_current: 0.015,
            box3_return_on_other_current: 0.06,
            box3_rate_current: 0.36,
            box3_exemption_current: 104_000,
            box3_rate_future: 0.36,
            box3_exemption_future: 5_000,
            box3_new_start_year: 2028,
            excess_cash_reinvestment_in_equity: 0.0,
            inflation_rate: 0.0225,
            planning_horizon_years: 10,
            planning_start_year: 2026,
            drawdown_per_year: 60_000,
            drawdown_start_year: 2028,
        }
    }
}

impl PlannerConfig {
    /// Build a config from loosely-typed parameters, filling absent keys with defaults.
    ///
    /// Integers accept JSON integers, JSON floats (truncated toward zero) and
    /// integer strings. Reals accept JSON numbers and numeric strings.
    /// Unknown keys are ignored.
    pub fn from_params(params: &ParamMap) -> Result<Self, PlannerError> {
        for key in params.keys() {
            if !PARAMETER_NAMES.contains(&key.as_str()) {
                log::debug!("Ignoring unknown parameter '{}'", key);
            }
        }

        let d = Self::default();
        let p = Params(params);

        Ok(Self {
            start_equity: p.int("start_equity", d.start_equity)?,
            start_bonds: p.int("start_bonds", d.start_bonds)?,
            start_property: p.int("start_property", d.start_property)?,
            start_cash: p.int("start_cash", d.start_cash)?,
            equity_growth_rate: p.real("equity_growth_rate", d.equity_growth_rate)?,
            equity_dividend_yield: p.real("equity_dividend_yield", d.equity_dividend_yield)?,
            bond_coupon: p.real("bond_coupon", d.bond_coupon)?,
            property_net_yield: p.real("property_net_yield", d.property_net_yield)?,
            cash_rate: p.real("cash_rate", d.cash_rate)?,
            box3_return_on_cash_current: p
                .real("box3_return_on_cash_current", d.box3_return_on_cash_current)?,
            box3_return_on_other_current: p
                .real("box3_return_on_other_current", d.box3_return_on_other_current)?,
            box3_rate_current: p.real("box3_rate_current", d.box3_rate_current)?,
            box3_exemption_current: p.int("box3_exemption_current", d.box3_exemption_current)?,
            box3_rate_future: p.real("box3_rate_future", d.box3_rate_future)?,
            box3_exemption_future: p.int("box3_exemption_future", d.box3_exemption_future)?,
            box3_new_start_year: p.year("box3_new_start_year", d.box3_new_start_year)?,
            excess_cash_reinvestment_in_equity: p.real(
                "excess_cash_reinvestment_in_equity",
                d.excess_cash_reinvestment_in_equity,
            )?,
            inflation_rate: p.real("inflation_rate", d.inflation_rate)?,
            planning_horizon_years: p.year("planning_horizon_years", d.planning_horizon_years)?,
            planning_start_year: p.year("planning_start_year", d.planning_start_year)?,
            drawdown_per_year: p.int("drawdown_per_year", d.drawdown_per_year)?,
            drawdown_start_year: p.year("drawdown_start_year", d.drawdown_start_year)?,
        })
    }

    /// Apply `name=value` overrides on top of an existing parameter map
    pub fn merge_overrides<'a, I>(params: &mut ParamMap, overrides: I) -> Result<(), PlannerError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for item in overrides {
            let (name, value) = item.split_once('=').ok_or_else(|| {
                PlannerError::InvalidRequest(format!("override '{}' is not NAME=VALUE", item))
            })?;
            params.insert(name.trim().to_string(), Value::String(value.trim().to_string()));
        }
        Ok(())
    }

    /// Fail fast on values the recurrence cannot sensibly project.
    ///
    /// The engine itself never calls this; callers validate before projecting.
    pub fn validate(&self) -> Result<(), PlannerError> {
        for (name, value) in [
            ("start_equity", self.start_equity),
            ("start_bonds", self.start_bonds),
            ("start_property", self.start_property),
            ("start_cash", self.start_cash),
            ("box3_exemption_current", self.box3_exemption_current),
            ("box3_exemption_future", self.box3_exemption_future),
            ("drawdown_per_year", self.drawdown_per_year),
        ] {
            if value < 0 {
                return Err(PlannerError::invalid(name, value, "must not be negative"));
            }
        }

        if !(0..=MAX_HORIZON_YEARS).contains(&self.planning_horizon_years) {
            return Err(PlannerError::invalid(
                "planning_horizon_years",
                self.planning_horizon_years,
                format!("must be between 0 and {}", MAX_HORIZON_YEARS),
            ));
        }

        if self
            .planning_start_year
            .checked_add(self.planning_horizon_years)
            .is_none()
        {
            return Err(PlannerError::invalid(
                "planning_start_year",
                self.planning_start_year,
                format!(
                    "horizon of {} year(s) runs past the last representable year",
                    self.planning_horizon_years
                ),
            ));
        }

        for (name, value) in [
            ("equity_growth_rate", self.equity_growth_rate),
            ("equity_dividend_yield", self.equity_dividend_yield),
            ("bond_coupon", self.bond_coupon),
            ("property_net_yield", self.property_net_yield),
            ("cash_rate", self.cash_rate),
            ("box3_return_on_cash_current", self.box3_return_on_cash_current),
            ("box3_return_on_other_current", self.box3_return_on_other_current),
            ("inflation_rate", self.inflation_rate),
        ] {
            if !value.is_finite() || value <= -1.0 {
                return Err(PlannerError::invalid(
                    name,
                    value,
                    "must be a finite rate greater than -1",
                ));
            }
        }

        for (name, value) in [
            ("box3_rate_current", self.box3_rate_current),
            ("box3_rate_future", self.box3_rate_future),
            (
                "excess_cash_reinvestment_in_equity",
                self.excess_cash_reinvestment_in_equity,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PlannerError::invalid(name, value, "must be between 0 and 1"));
            }
        }

        if self.drawdown_per_year > 0 && self.drawdown_start_year < self.planning_start_year {
            log::warn!(
                "drawdown_start_year {} precedes planning_start_year {}; no drawdown projected",
                self.drawdown_start_year,
                self.planning_start_year
            );
        }

        Ok(())
    }

    /// Starting balances
    pub fn portfolio(&self) -> Portfolio {
        Portfolio::new(
            self.start_equity,
            self.start_bonds,
            self.start_property,
            self.start_cash,
        )
    }

    /// Rate, tax and drawdown assumptions
    pub fn assumptions(&self) -> Assumptions {
        Assumptions {
            rates: RateAssumptions {
                equity_growth: self.equity_growth_rate,
                equity_dividend_yield: self.equity_dividend_yield,
                bond_coupon: self.bond_coupon,
                property_net_yield: self.property_net_yield,
                cash_rate: self.cash_rate,
                inflation: self.inflation_rate,
            },
            box3: Box3Assumptions {
                current: Box3Regime {
                    return_on_cash: self.box3_return_on_cash_current,
                    return_on_other: self.box3_return_on_other_current,
                    rate: self.box3_rate_current,
                    exemption: self.box3_exemption_current as f64,
                },
                // The New regime taxes actual income, deemed returns do not apply
                future: Box3Regime {
                    return_on_cash: 0.0,
                    return_on_other: 0.0,
                    rate: self.box3_rate_future,
                    exemption: self.box3_exemption_future as f64,
                },
                new_start_year: self.box3_new_start_year,
            },
            drawdown: DrawdownSchedule {
                annual_amount: self.drawdown_per_year as f64,
                start_year: self.drawdown_start_year,
            },
            reinvestment_fraction: self.excess_cash_reinvestment_in_equity,
        }
    }

    /// Horizon settings
    pub fn projection_config(&self) -> ProjectionConfig {
        ProjectionConfig {
            start_year: self.planning_start_year,
            horizon_years: self.planning_horizon_years,
        }
    }
}

/// Typed lookups over a parameter map
struct Params<'a>(&'a ParamMap);

impl Params<'_> {
    fn int(&self, name: &str, default: i64) -> Result<i64, PlannerError> {
        match self.0.get(name) {
            None => Ok(default),
            Some(value) => coerce_int(name, value),
        }
    }

    fn year(&self, name: &str, default: i32) -> Result<i32, PlannerError> {
        let value = self.int(name, default as i64)?;
        i32::try_from(value)
            .map_err(|_| PlannerError::coercion(name, format!("{} is out of range", value)))
    }

    fn real(&self, name: &str, default: f64) -> Result<f64, PlannerError> {
        match self.0.get(name) {
            None => Ok(default),
            Some(value) => coerce_real(name, value),
        }
    }
}

/// 2^63, the first float past `i64::MAX`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn coerce_int(name: &str, value: &Value) -> Result<i64, PlannerError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= -I64_BOUND && f < I64_BOUND => {
                    Ok(f.trunc() as i64)
                }
                _ => Err(PlannerError::coercion(
                    name,
                    format!("{} does not fit an integer", n),
                )),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            PlannerError::coercion(name, format!("expected an integer, got \"{}\"", s))
        }),
        other => Err(PlannerError::coercion(
            name,
            format!("expected an integer, got {}", json_kind(other)),
        )),
    }
}

fn coerce_real(name: &str, value: &Value) -> Result<f64, PlannerError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => {
            return Err(PlannerError::coercion(
                name,
                format!("expected a number, got {}", json_kind(other)),
            ))
        }
    };

    match parsed {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(PlannerError::coercion(
            name,
            format!("expected a finite number, got {}", value),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn params(value: Value) -> ParamMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("test params must be an object"),
        }
    }

    #[test]
    fn test_empty_params_give_defaults() {
        let config = PlannerConfig::from_params(&ParamMap::new()).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_numeric_strings_and_floats_are_coerced() {
        let config = PlannerConfig::from_params(&params(json!({
            "start_equity": "1500000",
            "start_cash": 2500.9,
            "inflation_rate": "0.03",
            "planning_horizon_years": 20.0,
            "cash_rate": 0.02,
        })))
        .unwrap();

        assert_eq!(config.start_equity, 1_500_000);
        assert_eq!(config.start_cash, 2_500);
        assert_relative_eq!(config.inflation_rate, 0.03);
        assert_eq!(config.planning_horizon_years, 20);
        assert_relative_eq!(config.cash_rate, 0.02);
        assert_eq!(config.start_bonds, 1_100_000);
    }

    #[test]
    fn test_negative_float_truncates_toward_zero() {
        let config =
            PlannerConfig::from_params(&params(json!({ "start_cash": -2.7 }))).unwrap();
        assert_eq!(config.start_cash, -2);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config =
            PlannerConfig::from_params(&params(json!({ "favourite_colour": "blue" }))).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_coercion_errors() {
        let cases = [
            json!({ "start_equity": "lots" }),
            json!({ "start_equity": "1.5" }),
            json!({ "start_equity": null }),
            json!({ "cash_rate": true }),
            json!({ "cash_rate": "NaN" }),
            json!({ "cash_rate": [0.01] }),
            json!({ "planning_start_year": 1e12 }),
        ];

        for case in cases {
            let err = PlannerConfig::from_params(&params(case.clone())).unwrap_err();
            assert!(
                matches!(err, PlannerError::Coercion { .. }),
                "expected coercion error for {}, got {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_coercion_error_names_parameter() {
        let err =
            PlannerConfig::from_params(&params(json!({ "bond_coupon": "abc" }))).unwrap_err();
        match err {
            PlannerError::Coercion { parameter, .. } => assert_eq!(parameter, "bond_coupon"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_merge_overrides() {
        let mut map = params(json!({ "start_equity": 1 }));
        PlannerConfig::merge_overrides(&mut map, ["start_equity = 5", "cash_rate=0.01"]).unwrap();
        let config = PlannerConfig::from_params(&map).unwrap();
        assert_eq!(config.start_equity, 5);
        assert_relative_eq!(config.cash_rate, 0.01);

        assert!(PlannerConfig::merge_overrides(&mut map, ["start_equity"]).is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let invalid = [
            PlannerConfig {
                start_bonds: -1,
                ..Default::default()
            },
            PlannerConfig {
                planning_horizon_years: -3,
                ..Default::default()
            },
            PlannerConfig {
                planning_horizon_years: MAX_HORIZON_YEARS + 1,
                ..Default::default()
            },
            PlannerConfig {
                excess_cash_reinvestment_in_equity: 1.2,
                ..Default::default()
            },
            PlannerConfig {
                box3_rate_future: -0.1,
                ..Default::default()
            },
            PlannerConfig {
                inflation_rate: -1.0,
                ..Default::default()
            },
            PlannerConfig {
                equity_growth_rate: f64::INFINITY,
                ..Default::default()
            },
        ];

        for config in invalid {
            assert!(
                matches!(config.validate(), Err(PlannerError::InvalidParameter { .. })),
                "expected rejection of {:?}",
                config
            );
        }
    }

    #[test]
    fn test_validate_rejects_horizon_past_last_year() {
        let config = PlannerConfig {
            planning_start_year: i32::MAX - 7,
            planning_horizon_years: 10,
            ..Default::default()
        };
        match config.validate() {
            Err(PlannerError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, "planning_start_year")
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        let fits = PlannerConfig {
            planning_start_year: i32::MAX - 10,
            planning_horizon_years: 10,
            ..Default::default()
        };
        assert!(fits.validate().is_ok());
        assert_eq!(fits.projection_config().years().len(), 10);
    }

    #[test]
    fn test_validate_accepts_zero_horizon_and_negative_rates() {
        let config = PlannerConfig {
            planning_horizon_years: 0,
            equity_growth_rate: -0.2,
            inflation_rate: -0.01,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_split_into_parts() {
        let config = PlannerConfig::default();
        assert_eq!(config.portfolio().equity, 2_000_000);
        assert_eq!(config.projection_config().start_year, 2026);
        assert_eq!(config.projection_config().horizon_years, 10);
        assert_relative_eq!(config.assumptions().box3.future.exemption, 5_000.0);
    }
}
