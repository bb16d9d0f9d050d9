//! Wealth Planner CLI
//!
//! Command-line interface for running a projection from defaults, a
//! parameter file and inline overrides

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use wealth_planner::assumptions::{load_params, ParamMap};
use wealth_planner::{project, PlannerConfig, ProjectionResult};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "wealth_planner",
    about = "Year-by-year wealth projection with Box 3 tax and drawdowns"
)]
struct Cli {
    #[arg(
        long,
        help = "Parameter file: a JSON object or a parameter,value CSV"
    )]
    params: Option<PathBuf>,
    #[arg(
        long = "set",
        value_name = "NAME=VALUE",
        help = "Override a single parameter; may be repeated"
    )]
    overrides: Vec<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    #[arg(long, help = "Write output to this file instead of stdout")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut params = match &cli.params {
        Some(path) => load_params(path)
            .with_context(|| format!("failed to load parameters from {}", path.display()))?,
        None => ParamMap::new(),
    };
    PlannerConfig::merge_overrides(&mut params, cli.overrides.iter().map(String::as_str))?;

    let config = PlannerConfig::from_params(&params)?;
    config.validate()?;

    let result = project(&config);

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("unable to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match cli.format {
        OutputFormat::Table => write_table(&mut out, &result)?,
        OutputFormat::Csv => result.write_csv(&mut out)?,
        OutputFormat::Json => writeln!(out, "{}", result.to_json()?)?,
    }
    out.flush()?;

    if let Some(path) = &cli.output {
        eprintln!("Results written to: {}", path.display());
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, result: &ProjectionResult) -> io::Result<()> {
    writeln!(
        out,
        "{:>5} {:>14} {:>12} {:>12} {:>12} {:>12} {:>4} {:>12} {:>12} {:>12} {:>14}",
        "Year", "Equity", "Bonds", "Property", "Cash", "Income", "Box3", "Tax", "Drawdown",
        "NetCF", "TotalValue"
    )?;
    writeln!(out, "{}", "-".repeat(141))?;

    for row in result {
        let income = row.income_equity_growth
            + row.income_equity_dividend
            + row.income_bonds_coupon
            + row.income_rentals
            + row.income_interest_on_cash;
        writeln!(
            out,
            concat!(
                "{:>5} {:>14.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>4} ",
                "{:>12.0} {:>12.0} {:>12.0} {:>14.0}"
            ),
            row.year,
            row.start_equity,
            row.start_bonds,
            row.start_property,
            row.start_cash,
            income,
            row.box3_regime.to_string(),
            row.box3_tax,
            row.cashflow_drawdown,
            row.cashflow_total,
            row.total_value,
        )?;
    }

    let summary = result.summary();
    writeln!(out, "\nSummary:")?;
    writeln!(out, "  Years projected: {}", summary.total_years)?;
    writeln!(out, "  Total Box 3 tax: {:.2}", summary.total_tax)?;
    writeln!(out, "  Total drawdown: {:.2}", summary.total_drawdown)?;
    writeln!(out, "  Cumulative net cash flow: {:.2}", summary.total_net_cashflow)?;
    writeln!(out, "  Final total value: {:.2}", summary.final_total_value)?;
    Ok(())
}
