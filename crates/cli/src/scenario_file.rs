//! Loading run descriptions from disk and from flags.

use std::fs;
use std::path::Path;

use serde_json::Value;
use zeilrace_core::Scenario;

use crate::error::CliError;

/// Reads and validates a scenario JSON file.
pub fn load(path: &Path) -> Result<Scenario, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    let scenario: Scenario = serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid scenario {}: {e}", path.display())))?;
    scenario.validate()?;
    Ok(scenario)
}

/// Parses the `--params` flag, which must be a JSON object.
pub fn parse_params(raw: &str) -> Result<Value, CliError> {
    let params: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    Ok(params)
}
