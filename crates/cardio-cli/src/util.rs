use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use cardio_classifiers::inference::{RawRecord, RawValue};

pub fn validate_tsv_or_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("File must have a .tsv or .csv extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// Parse a `name=value` form answer.
pub fn parse_field(input: &str) -> Result<(String, RawValue)> {
    let Some((name, value)) = input.split_once('=') else {
        anyhow::bail!("Field must look like name=value: {}", input);
    };
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Field name is empty: {}", input);
    }
    Ok((name.to_string(), RawValue::parse(value)))
}

/// Read form answers from a flat JSON object of numbers and strings.
pub fn read_fields_json(path: &Path) -> Result<RawRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fields file: {:?}", path))?;
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("Fields file must hold a JSON object: {:?}", path))?;

    let mut record = RawRecord::new();
    for (name, value) in object {
        let raw = match value {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => RawValue::Number(v),
                None => anyhow::bail!("Field '{}' is not a finite number", name),
            },
            serde_json::Value::String(s) => RawValue::parse(&s),
            other => anyhow::bail!("Field '{}' must be a number or a string, got {}", name, other),
        };
        record.insert(name, raw);
    }
    Ok(record)
}
