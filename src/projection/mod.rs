//! Projection engine for multi-year wealth ledgers

mod state;
mod engine;
mod records;

pub use state::OpeningBalances;
pub use engine::{ProjectionEngine, ProjectionConfig};
pub use records::{YearRecord, ProjectionResult, ProjectionSummary, COLUMN_NAMES};

use crate::config::PlannerConfig;

/// Project a full configuration.
///
/// Pure and deterministic; does not validate. Call
/// [`PlannerConfig::validate`] first when the input comes from outside.
pub fn project(config: &PlannerConfig) -> ProjectionResult {
    ProjectionEngine::new(config.assumptions(), config.projection_config())
        .project(&config.portfolio())
}
