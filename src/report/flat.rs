//! CSV de una sola fila con las claves anidadas aplanadas.

use super::Report;
use crate::error::ReportError;
use serde_json::Value;

const SEPARATOR: &str = "_";

pub(super) fn csv_report(report: &Report) -> Result<String, ReportError> {
    let mut columns = Vec::new();
    flatten(&serde_json::to_value(&report.metadata)?, "", &mut columns);
    if let Some(analysis) = &report.analysis {
        flatten(&serde_json::to_value(analysis)?, "analysis", &mut columns);
    }

    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns.iter().map(|(key, _)| key.as_str()))?;
    writer.write_record(columns.iter().map(|(_, value)| value.as_str()))?;
    let bytes = writer
        .into_inner()
        .map_err(|error| ReportError::Csv(csv::Error::from(error.into_error())))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Aplana objetos uniendo claves con `_`; las listas se guardan como JSON.
fn flatten(value: &Value, prefix: &str, columns: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}{SEPARATOR}{key}")
                };
                flatten(nested, &key, columns);
            }
        }
        Value::Array(_) => columns.push((prefix.to_string(), value.to_string())),
        Value::String(text) => columns.push((prefix.to_string(), text.clone())),
        Value::Null => columns.push((prefix.to_string(), String::new())),
        other => columns.push((prefix.to_string(), other.to_string())),
    }
}
