//! Wealth Planner - deterministic multi-year personal wealth projection
//!
//! This library provides:
//! - A yearly ledger of balances, income, Box 3 tax and cash flow for
//!   equity, bonds, property and cash
//! - Old/New Box 3 regime switching and inflation-indexed drawdowns
//! - A flat, validated parameter set with centralized defaults
//! - CSV and JSON export, and a request handler for HTTP front ends

pub mod error;
pub mod portfolio;
pub mod assumptions;
pub mod config;
pub mod projection;
pub mod api;

// Re-export commonly used types
pub use error::PlannerError;
pub use portfolio::Portfolio;
pub use assumptions::{Assumptions, Box3Assumptions, Box3Regime, DrawdownSchedule, TaxRegime};
pub use config::PlannerConfig;
pub use projection::{project, ProjectionEngine, ProjectionConfig, ProjectionResult, YearRecord};
