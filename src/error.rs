//! Error taxonomy for configuration, projection I/O and the request boundary

use thiserror::Error;

/// Errors raised before or around a projection run.
///
/// The engine itself never fails; every variant here comes from turning
/// caller input into a [`PlannerConfig`](crate::PlannerConfig) or from
/// reading and writing files.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A supplied parameter could not be converted to its numeric type
    #[error("parameter '{parameter}': {message}")]
    Coercion { parameter: String, message: String },

    /// A parameter converted fine but lies outside its sane range
    #[error("parameter '{parameter}' = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// The request body was not a usable parameter object
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    pub(crate) fn coercion(parameter: &str, message: impl Into<String>) -> Self {
        PlannerError::Coercion {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid(
        parameter: &str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        PlannerError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
