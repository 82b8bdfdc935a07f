use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::Result;
use crate::model::AggregationResult;

/// Renders the totals as pretty-printed JSON.
///
/// A non-empty result becomes an array of `{"Category", "Value"}` objects in
/// category order; an empty result becomes `{}`.
pub fn render_summary(result: &AggregationResult) -> Result<String> {
    if result.is_empty() {
        return Ok(serde_json::to_string_pretty(&Value::Object(Map::new()))?);
    }
    Ok(serde_json::to_string_pretty(&result.entries())?)
}

/// Writes `contents` to `path`, replacing any previous file.
///
/// The data goes to a sibling `.tmp` file first and is renamed into place, so
/// `path` either keeps its old contents or receives the complete new ones.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = temp_path_for(path);
    if let Err(err) = fs::write(&temp_path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
