//! Report artifact persistence.
//!
//! The report phase fetches the read-only sprint report and velocity chart
//! and drops them next to the run as pretty-printed JSON, mirroring what a
//! human would export from the board.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::ProvisionError;

pub const SPRINT_REPORT_FILE: &str = "sprint1_report.json";
pub const VELOCITY_FILE: &str = "velocity.json";

/// Write one report payload under `out_dir` and return the full path.
pub fn write_artifact(
    out_dir: &Path,
    file_name: &str,
    payload: &Value,
) -> Result<PathBuf, ProvisionError> {
    let path = out_dir.join(file_name);
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());
    std::fs::write(&path, pretty).map_err(|source| ProvisionError::LocalIo {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
