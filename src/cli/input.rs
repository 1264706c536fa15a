//! Reading task submissions
//!
//! Task files are JSON arrays, or YAML sequences when the file name ends in
//! `.yaml`/`.yml`. A missing path or `-` reads JSON from stdin.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Reads raw task records from a file or stdin
pub fn read_records(path: Option<&Path>) -> Result<Value> {
    match path {
        None => read_stdin(),
        Some(p) if p.as_os_str() == "-" => read_stdin(),
        Some(p) => {
            let content = fs::read_to_string(p)
                .with_context(|| format!("Failed to read task file: {}", p.display()))?;

            if is_yaml(p) {
                serde_yaml::from_str(&content)
                    .with_context(|| format!("Invalid YAML in {}", p.display()))
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid JSON in {}", p.display()))
            }
        }
    }
}

fn read_stdin() -> Result<Value> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read tasks from stdin")?;
    serde_json::from_str(&content).context("Invalid JSON on stdin")
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
