//! Interpretacion de marcas de tiempo ISO-8601 provenientes de la extraccion.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TimestampError {
    #[error("missing `{field}` timestamp")]
    Missing { field: &'static str },

    #[error("invalid `{field}` timestamp: {value:?}")]
    Invalid { field: &'static str, value: String },
}

/// Interpreta una marca de tiempo. Los valores con zona horaria se llevan a
/// la hora local para poder compararlos con valores sin zona.
pub fn parse_timestamp(
    field: &'static str,
    raw: Option<&str>,
) -> Result<NaiveDateTime, TimestampError> {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(TimestampError::Missing { field })?;

    if let Ok(aware) = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, OFFSET_FORMAT))
    {
        return Ok(aware.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimestampError::Invalid {
            field,
            value: value.to_string(),
        })
}

/// Dias completos transcurridos entre `from` y `to`, redondeando hacia abajo.
pub fn elapsed_days(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds().div_euclid(86_400)
}
