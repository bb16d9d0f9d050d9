//! Parameter file loader
//!
//! Reads planner parameter overrides from a flat JSON object or from a
//! two-column CSV file (`parameter,value`). Values stay loosely typed here;
//! [`PlannerConfig::from_params`](crate::PlannerConfig::from_params) does
//! the coercion.

use crate::error::PlannerError;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loosely-typed parameter set keyed by parameter name
pub type ParamMap = Map<String, Value>;

/// Raw CSV row of a parameter file
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    parameter: String,
    value: String,
}

/// Load parameters from a file, choosing the format by extension.
/// Anything other than `.csv` is read as JSON.
pub fn load_params(path: &Path) -> Result<ParamMap, PlannerError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let file = File::open(path)?;
    let params = if is_csv {
        load_params_csv(file)?
    } else {
        load_params_json(file)?
    };

    log::info!("Loaded {} parameter(s) from {}", params.len(), path.display());
    Ok(params)
}

/// Load a `parameter,value` CSV. Blank values are skipped so the default applies.
pub fn load_params_csv<R: Read>(reader: R) -> Result<ParamMap, PlannerError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut params = ParamMap::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        if row.value.is_empty() {
            continue;
        }
        params.insert(row.parameter, Value::String(row.value));
    }

    Ok(params)
}

/// Load a flat JSON object
pub fn load_params_json<R: Read>(reader: R) -> Result<ParamMap, PlannerError> {
    let value: Value = serde_json::from_reader(reader)?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(PlannerError::InvalidRequest(format!(
            "expected a JSON object of parameters, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
