use serde::Serialize;
use std::path::Path;

use crate::error::Result;

/// Pretty-printed JSON for any plan structure
pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Export any serializable plan structure to a JSON file
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json_data = to_json(data)?;
    std::fs::write(output_path, json_data)?;
    Ok(())
}
