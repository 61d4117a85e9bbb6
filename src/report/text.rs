//! Reporte legible para personas y resumen rapido.

use super::Report;
use crate::analysis::AnalysisResult;
use crate::formatting::format_decimal;
use std::fmt::Display;

const WIDE_RULE: usize = 80;
const SUMMARY_RULE: usize = 60;
const NOT_AVAILABLE: &str = "N/A";

/// Campos EXIF que se muestran siempre que existan.
const IMPORTANT_EXIF_FIELDS: [&str; 7] = [
    "Make",
    "Model",
    "DateTime",
    "DateTimeOriginal",
    "Software",
    "Artist",
    "Copyright",
];

struct Lines(Vec<String>);

impl Lines {
    fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    fn blank(&mut self) {
        self.0.push(String::new());
    }

    fn heading(&mut self, title: &str) {
        self.push(title);
        self.push("-".repeat(WIDE_RULE));
    }

    fn banner(&mut self, title: &str) {
        self.push("=".repeat(WIDE_RULE));
        self.push(title);
        self.push("=".repeat(WIDE_RULE));
    }

    fn field(&mut self, label: &str, value: impl Display) {
        self.push(format!("  {:<17}{value}", format!("{label}:")));
    }

    fn padded(&mut self, label: &str, value: impl Display) {
        self.push(format!("  {label:<20}: {value}"));
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

pub(super) fn full_report(report: &Report) -> String {
    let metadata = &report.metadata;
    let info = metadata.file_info.data();
    let info_text = |select: fn(&crate::analysis::input::FileInfo) -> Option<&str>| {
        or_na(info.and_then(select)).to_string()
    };

    let mut lines = Lines(Vec::new());
    lines.banner("FILE METADATA ANALYSIS REPORT");
    lines.push(format!(
        "Generated: {}",
        report.report_info.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.blank();

    lines.heading("FILE INFORMATION");
    lines.field("Filename", info_text(|i| i.filename.as_deref()));
    lines.field("Full Path", info_text(|i| i.full_path.as_deref()));
    lines.field("File Size", info_text(|i| i.size_human.as_deref()));
    lines.field(
        "File Type",
        metadata.file_type.map_or(NOT_AVAILABLE, |file_type| file_type.as_str()),
    );
    lines.field("MIME Type", or_na(metadata.mime_type.as_deref()));
    lines.blank();

    lines.heading("TIMESTAMPS");
    lines.field("Created", info_text(|i| i.created.as_deref()));
    lines.field("Modified", info_text(|i| i.modified.as_deref()));
    lines.field("Accessed", info_text(|i| i.accessed.as_deref()));
    lines.blank();

    lines.heading("FILE INTEGRITY");
    lines.field("MD5", info_text(|i| i.md5_hash.as_deref()));
    lines.field("SHA-256", info_text(|i| i.sha256_hash.as_deref()));
    lines.blank();

    if let Some(image) = metadata.image_metadata.data() {
        let number = |value: Option<u64>| value.map_or(NOT_AVAILABLE.to_string(), |v| v.to_string());
        lines.heading("IMAGE PROPERTIES");
        lines.field("Format", or_na(image.format.as_deref()));
        lines.field(
            "Dimensions",
            format!("{} x {}", number(image.width), number(image.height)),
        );
        lines.field("Mode", or_na(image.mode.as_deref()));
        lines.blank();
    }

    if let Some(gps) = metadata.gps_data.data()
        && let Some(latitude) = gps.latitude_decimal
    {
        lines.heading("GPS LOCATION DATA");
        lines.field("Coordinates", or_na(gps.coordinates.as_deref()));
        lines.field("Latitude", format_decimal(latitude));
        lines.field(
            "Longitude",
            gps.longitude_decimal
                .map_or(NOT_AVAILABLE.to_string(), format_decimal),
        );
        if let Some(altitude) = gps.altitude_meters {
            lines.field("Altitude", format!("{} meters", format_decimal(altitude)));
        }
        lines.push("  WARNING: This file contains GPS coordinates!");
        lines.blank();
    }

    if let Some(exif) = metadata.exif_data.data()
        && !exif.is_empty()
    {
        lines.heading("EXIF DATA (Selected Fields)");
        let mut shown = 0;
        for field in IMPORTANT_EXIF_FIELDS {
            if let Some(value) = exif.get(field) {
                lines.padded(field, value);
                shown += 1;
            }
        }
        let additional = exif.len() - shown;
        if additional > 0 {
            lines.push(format!("  ... and {additional} more EXIF fields"));
        }
        lines.blank();
    }

    if let Some(document) = metadata.document_metadata.data() {
        lines.heading("DOCUMENT PROPERTIES");
        let page_count = document.page_count.map(|count| count.to_string());
        let properties = [
            ("Author", document.author.as_deref()),
            ("Title", document.title.as_deref()),
            ("Subject", document.subject.as_deref()),
            ("Creator", document.creator.as_deref()),
            ("Keywords", document.keywords.as_deref()),
            ("Created", document.created.as_deref()),
            ("Modified", document.modified.as_deref()),
            ("Last Modified By", document.last_modified_by.as_deref()),
            ("Page Count", page_count.as_deref()),
        ];
        for (label, value) in properties {
            if let Some(value) = value {
                lines.padded(label, value);
            }
        }
        lines.blank();
    }

    if let Some(media) = metadata.media_metadata.data() {
        lines.heading("MEDIA PROPERTIES");
        if let Some(stream) = &media.stream {
            if let Some(length) = stream.length {
                lines.padded("Length", format_decimal(length));
            }
            for (label, value) in [
                ("Bitrate", stream.bitrate),
                ("Sample Rate", stream.sample_rate),
                ("Channels", stream.channels),
            ] {
                if let Some(value) = value {
                    lines.padded(label, value);
                }
            }
        }
        lines.blank();
    }

    if let Some(analysis) = &report.analysis {
        append_analysis(&mut lines, analysis);
    }

    lines.banner("END OF REPORT");
    lines.0.join("\n")
}

fn append_analysis(lines: &mut Lines, analysis: &AnalysisResult) {
    let summary = &analysis.summary;

    lines.banner("FORENSIC ANALYSIS");
    lines.blank();

    lines.heading("SUMMARY");
    lines.push(format!("  Risk Level:              {}", analysis.risk_level));
    lines.push(format!("  Anomalies Found:         {}", summary.total_anomalies));
    lines.push(format!("  Privacy Concerns:        {}", summary.total_privacy_concerns));
    lines.push(format!("  Forensic Indicators:     {}", summary.total_forensic_indicators));
    lines.push(format!("  Has GPS Data:            {}", yes_no(summary.has_gps)));
    lines.push(format!("  Has Author Info:         {}", yes_no(summary.has_author_info)));
    lines.blank();

    if !analysis.anomalies.is_empty() {
        lines.heading("ANOMALIES DETECTED");
        for (index, anomaly) in analysis.anomalies.iter().enumerate() {
            lines.push(format!("  [{}] {}", index + 1, anomaly.kind));
            lines.push(format!("      Severity: {}", anomaly.severity));
            lines.push(format!("      Description: {}", anomaly.description));
            if let Some(details) = &anomaly.details {
                lines.push(format!("      Details: {details}"));
            }
            lines.push(format!("      Significance: {}", anomaly.forensic_significance));
            lines.blank();
        }
    }

    if !analysis.privacy_concerns.is_empty() {
        lines.heading("PRIVACY CONCERNS");
        for (index, concern) in analysis.privacy_concerns.iter().enumerate() {
            lines.push(format!("  [{}] {}", index + 1, concern.kind));
            lines.push(format!("      Severity: {}", concern.severity));
            lines.push(format!("      Description: {}", concern.description));
            lines.push(format!("      Recommendation: {}", concern.recommendation));
            lines.blank();
        }
    }

    if !analysis.forensic_indicators.is_empty() {
        lines.heading("FORENSIC INDICATORS");
        for (index, indicator) in analysis.forensic_indicators.iter().enumerate() {
            lines.push(format!("  [{}] {}", index + 1, indicator.kind));
            lines.push(format!("      Value: {}", indicator.value));
            lines.push(format!("      Significance: {}", indicator.significance));
            lines.blank();
        }
    }

    if !analysis.findings.is_empty() {
        lines.heading("FINDINGS");
        for (index, finding) in analysis.findings.iter().enumerate() {
            lines.push(format!("  [{}] {}", index + 1, finding.kind));
            lines.push(format!("      Severity: {}", finding.severity));
            lines.push(format!("      Description: {}", finding.description));
            if let Some(significance) = &finding.forensic_significance {
                lines.push(format!("      Significance: {significance}"));
            }
            lines.blank();
        }
    }

    lines.heading("RECOMMENDATIONS");
    for recommendation in analysis.recommendations() {
        lines.push(format!("  - {recommendation}"));
    }
    lines.blank();
}

pub(super) fn summary(report: &Report) -> String {
    let metadata = &report.metadata;
    let info = metadata.file_info.data();

    let mut lines = Lines(Vec::new());
    lines.push("QUICK SUMMARY");
    lines.push("=".repeat(SUMMARY_RULE));
    lines.push(format!(
        "File: {}",
        or_na(info.and_then(|i| i.filename.as_deref()))
    ));
    lines.push(format!(
        "Type: {}",
        metadata.file_type.map_or(NOT_AVAILABLE, |file_type| file_type.as_str())
    ));
    lines.push(format!(
        "Size: {}",
        or_na(info.and_then(|i| i.size_human.as_deref()))
    ));

    if let Some(analysis) = &report.analysis {
        let summary = &analysis.summary;
        lines.push(format!("Risk Level: {}", analysis.risk_level));
        lines.push(format!(
            "GPS Data: {}",
            if summary.has_gps { "Yes (!)" } else { "No" }
        ));
        lines.push(format!("Anomalies: {}", summary.total_anomalies));
        lines.push(format!("Privacy Concerns: {}", summary.total_privacy_concerns));
    }

    lines.push("=".repeat(SUMMARY_RULE));
    lines.0.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MetadataAnalyzer;
    use crate::analysis::input::MetadataInput;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_report() -> Report {
        let metadata = MetadataInput::from_json_value(json!({
            "file_info": {
                "filename": "IMG_0001.jpg",
                "size_human": "2.00 KB",
                "created": "2024-01-01T00:00:00",
                "modified": "2024-01-02T00:00:00",
                "accessed": "2024-01-03T00:00:00",
                "md5_hash": "abc123",
            },
            "file_type": "image",
            "exif_data": {"Make": "Canon", "Model": "EOS", "ExposureTime": "1/200"},
            "gps_data": {"latitude_decimal": 40.0, "longitude_decimal": -73.0, "coordinates": "40.0, -73.0"},
        }));
        let now = NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("fecha valida");
        let analysis = MetadataAnalyzer::new(&metadata)
            .with_reference_time(now)
            .analyze();
        let mut report = Report::new(metadata, Some(analysis));
        report.report_info.generated_at = now;
        report
    }

    #[test]
    fn full_report_has_sections_in_order() {
        let text = full_report(&sample_report());

        let order = [
            "FILE METADATA ANALYSIS REPORT",
            "Generated: 2025-01-01 00:00:00",
            "FILE INFORMATION",
            "TIMESTAMPS",
            "FILE INTEGRITY",
            "GPS LOCATION DATA",
            "EXIF DATA (Selected Fields)",
            "FORENSIC ANALYSIS",
            "PRIVACY CONCERNS",
            "RECOMMENDATIONS",
            "END OF REPORT",
        ];
        let mut cursor = 0;
        for marker in order {
            let position = text[cursor..]
                .find(marker)
                .unwrap_or_else(|| panic!("falta `{marker}`"));
            cursor += position + marker.len();
        }
    }

    #[test]
    fn full_report_lists_selected_exif_and_counts_rest() {
        let text = full_report(&sample_report());

        assert!(text.contains("  Make                : Canon"));
        assert!(text.contains("  Filename:        IMG_0001.jpg"));
        assert!(text.contains("  MIME Type:       N/A"));
        assert!(text.contains("... and 1 more EXIF fields"));
        assert!(text.contains("  Risk Level:              CRITICAL"));
        assert!(text.contains("  - Remove GPS coordinates before sharing photos online"));
    }

    #[test]
    fn summary_without_analysis_is_short() {
        let report = Report::new(MetadataInput::default(), None);
        let text = summary(&report);

        assert!(text.starts_with("QUICK SUMMARY"));
        assert!(text.contains("File: N/A"));
        assert!(!text.contains("Risk Level"));
    }
}
