use serde::Serialize;

use crate::error::ScanError;

/// Output path meaning "write to stdout".
pub const STDOUT: &str = "-";

/// Write `value` as pretty-printed JSON to `path` (or stdout for `-`).
pub fn save_json<T: Serialize>(value: &T, path: &str) -> Result<(), ScanError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ScanError::Json {
        context: format!("serializing {}", path),
        source: e,
    })?;

    write_output(&json, path)
}

/// Write text to `path` (or stdout for `-`), ending it with a newline.
pub fn write_output(content: &str, path: &str) -> Result<(), ScanError> {
    if path == STDOUT {
        println!("{}", content.trim_end_matches('\n'));
        return Ok(());
    }

    let mut text = content.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    std::fs::write(path, text).map_err(|e| ScanError::Write {
        path: path.to_string(),
        source: e,
    })
}
