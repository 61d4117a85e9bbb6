use chrono::{DateTime, Local, NaiveDateTime};
use std::time::SystemTime;

/// Convierte una marca del sistema de archivos a ISO-8601 en hora local.
pub fn format_system_time(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    format_iso(datetime.naive_local())
}

pub fn format_iso(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit_index = 0;

    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    format!("{value:.2} {}", UNITS[unit_index])
}

/// Formatea un decimal conservando siempre al menos un digito fraccionario
/// (`40.0`, `-73.9857`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
