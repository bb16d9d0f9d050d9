//! Request handling for the calculate endpoint
//!
//! Transport-agnostic: takes the raw request body, returns a status code
//! and a serializable body. Every failure becomes a 400 with a readable
//! message; nothing is ever partially computed.

use serde::Serialize;
use serde_json::Value;

use crate::assumptions::loader::json_kind;
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::projection::{project, YearRecord};

/// Response body of the calculate endpoint
#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<YearRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status code plus body
#[derive(Debug)]
pub struct ApiReply {
    pub status: u16,
    pub body: CalculateResponse,
}

impl ApiReply {
    fn ok(data: Vec<YearRecord>) -> Self {
        Self {
            status: 200,
            body: CalculateResponse {
                success: true,
                data: Some(data),
                error: None,
            },
        }
    }

    fn bad_request(err: &PlannerError) -> Self {
        Self {
            status: 400,
            body: CalculateResponse {
                success: false,
                data: None,
                error: Some(err.to_string()),
            },
        }
    }

    /// Body serialized as JSON
    pub fn to_json(&self) -> Result<String, PlannerError> {
        Ok(serde_json::to_string(&self.body)?)
    }
}

/// Parse, coerce and validate one request body.
/// An empty body means "all defaults".
pub fn parse_request(body: &str) -> Result<PlannerConfig, PlannerError> {
    let value: Value = if body.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(body)
            .map_err(|e| PlannerError::InvalidRequest(format!("invalid JSON: {}", e)))?
    };

    let params = match value {
        Value::Object(map) => map,
        other => {
            return Err(PlannerError::InvalidRequest(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let config = PlannerConfig::from_params(&params)?;
    config.validate()?;
    Ok(config)
}

/// Handle a calculate request end to end
pub fn handle_calculate(body: &str) -> ApiReply {
    match parse_request(body) {
        Ok(config) => ApiReply::ok(project(&config).into_records()),
        Err(err) => {
            log::warn!("Rejected calculate request: {}", err);
            ApiReply::bad_request(&err)
        }
    }
}
