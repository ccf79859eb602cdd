use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::registry::DeliveryLocationRegistry;

/// One candidate row of a bulk import. A missing country deserializes as
/// empty and is counted as skipped by the registry, so a single bad row
/// never sinks the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(TransferError::UnsupportedFormat(other.to_string())),
        }
    }
}

const CSV_HEADER: &str = "country,region,city,is_active";

/// Quote a field when it contains a comma or quote, doubling inner quotes.
/// Line breaks inside field values are not supported; parsing is
/// line-based.
fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one CSV line into trimmed fields, honoring quoted fields with
/// doubled-quote escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Parse an import payload into candidate records. CSV columns are
/// `country,region,city`; extra columns (such as `is_active` from an
/// earlier export) are ignored, imports always land active.
pub fn parse_records(format: ExportFormat, input: &str) -> Result<Vec<LocationRecord>, TransferError> {
    match format {
        ExportFormat::Json => serde_json::from_str(input)
            .map_err(|e| TransferError::Malformed(e.to_string())),
        ExportFormat::Csv => {
            let mut records = Vec::new();
            for (index, line) in input.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                // A leading header row is optional
                if index == 0 && line.to_lowercase().starts_with("country") {
                    continue;
                }
                let mut fields = split_csv_line(line).into_iter();
                records.push(LocationRecord {
                    country: fields.next().unwrap_or_default(),
                    region: fields.next().filter(|f| !f.is_empty()),
                    city: fields.next().filter(|f| !f.is_empty()),
                });
            }
            Ok(records)
        }
    }
}

/// Serialize the registry for external backup or editing.
pub fn export(registry: &DeliveryLocationRegistry, format: ExportFormat) -> Result<String, TransferError> {
    let locations = registry.list();
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(&locations)
            .map_err(|e| TransferError::Malformed(e.to_string())),
        ExportFormat::Csv => {
            let mut out = String::from(CSV_HEADER);
            out.push('\n');
            for location in locations {
                out.push_str(&format!(
                    "{},{},{},{}\n",
                    escape_csv_field(&location.country),
                    escape_csv_field(location.region.as_deref().unwrap_or_default()),
                    escape_csv_field(location.city.as_deref().unwrap_or_default()),
                    location.is_active,
                ));
            }
            Ok(out)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed import payload: {0}")]
    Malformed(String),
}
