//! Exportacion a hoja de calculo con una fila por dato.

use super::Report;
use crate::error::ReportError;
use crate::formatting::format_decimal;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;

const INFO: &str = "INFO";

struct ExportRow {
    section: &'static str,
    label: String,
    value: String,
    level: String,
}

impl ExportRow {
    fn info(section: &'static str, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            section,
            label: label.into(),
            value: value.into(),
            level: INFO.to_string(),
        }
    }
}

pub(super) fn export_xlsx(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Metadata")?;

    worksheet.set_column_width(0, 22.0)?;
    worksheet.set_column_width(1, 32.0)?;
    worksheet.set_column_width(2, 70.0)?;
    worksheet.set_column_width(3, 14.0)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x1F4E78))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let cell_format = Format::new()
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Left);

    let level_format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    for (column, title) in ["Section", "Field", "Value", "Level"].into_iter().enumerate() {
        worksheet.write_with_format(0, column as u16, title, &header_format)?;
    }

    for (index, row) in collect_rows(report).iter().enumerate() {
        let row_index = (index + 1) as u32;
        worksheet.write_with_format(row_index, 0, row.section, &cell_format)?;
        worksheet.write_with_format(row_index, 1, row.label.as_str(), &cell_format)?;
        worksheet.write_with_format(row_index, 2, row.value.as_str(), &cell_format)?;
        worksheet.write_with_format(row_index, 3, row.level.as_str(), &level_format)?;
    }

    workbook.save(path)?;
    tracing::info!(path = %path.display(), "reporte XLSX exportado");
    Ok(())
}

fn collect_rows(report: &Report) -> Vec<ExportRow> {
    let metadata = &report.metadata;
    let mut rows = Vec::new();

    if let Some(info) = metadata.file_info.data() {
        let size = info.size_bytes.map(|bytes| bytes.to_string());
        let fields = [
            ("Filename", info.filename.as_deref()),
            ("Full Path", info.full_path.as_deref()),
            ("Size (bytes)", size.as_deref()),
            ("Size", info.size_human.as_deref()),
            ("Created", info.created.as_deref()),
            ("Modified", info.modified.as_deref()),
            ("Accessed", info.accessed.as_deref()),
            ("MD5", info.md5_hash.as_deref()),
            ("SHA-256", info.sha256_hash.as_deref()),
        ];
        rows.extend(
            fields
                .into_iter()
                .filter_map(|(label, value)| value.map(|value| ExportRow::info("File", label, value))),
        );
    } else if let Some(error) = metadata.file_info.error() {
        rows.push(ExportRow::info("File", "Error", error));
    }

    if let Some(file_type) = metadata.file_type {
        rows.push(ExportRow::info("File", "Type", file_type.as_str()));
    }
    if let Some(mime) = &metadata.mime_type {
        rows.push(ExportRow::info("File", "MIME Type", mime.as_str()));
    }

    if let Some(image) = metadata.image_metadata.data() {
        if let Some(format) = &image.format {
            rows.push(ExportRow::info("Image", "Format", format.as_str()));
        }
        if let (Some(width), Some(height)) = (image.width, image.height) {
            rows.push(ExportRow::info("Image", "Dimensions", format!("{width} x {height}")));
        }
        if let Some(mode) = &image.mode {
            rows.push(ExportRow::info("Image", "Mode", mode.as_str()));
        }
    }

    if let Some(gps) = metadata.gps_data.data() {
        for (label, value) in [
            ("Latitude", gps.latitude_decimal),
            ("Longitude", gps.longitude_decimal),
            ("Altitude (m)", gps.altitude_meters),
        ] {
            if let Some(value) = value {
                rows.push(ExportRow::info("GPS", label, format_decimal(value)));
            }
        }
    }

    if let Some(exif) = metadata.exif_data.data() {
        rows.extend(
            exif.fields
                .iter()
                .map(|(key, value)| ExportRow::info("EXIF", key.as_str(), value.as_str())),
        );
        rows.extend(
            exif.parsed_dates
                .iter()
                .map(|(label, value)| ExportRow::info("EXIF Dates", label.as_str(), value.as_str())),
        );
    }

    if let Some(document) = metadata.document_metadata.data() {
        let revision = document.revision.map(|value| value.to_string());
        let pages = document.page_count.map(|value| value.to_string());
        let fields = [
            ("Author", document.author.as_deref()),
            ("Creator", document.creator.as_deref()),
            ("Title", document.title.as_deref()),
            ("Subject", document.subject.as_deref()),
            ("Keywords", document.keywords.as_deref()),
            ("Comments", document.comments.as_deref()),
            ("Description", document.description.as_deref()),
            ("Company", document.company.as_deref()),
            ("Organization", document.organization.as_deref()),
            ("Category", document.category.as_deref()),
            ("Revision", revision.as_deref()),
            ("Last Modified By", document.last_modified_by.as_deref()),
            ("Created", document.created.as_deref()),
            ("Modified", document.modified.as_deref()),
            ("Producer", document.producer.as_deref()),
            ("Page Count", pages.as_deref()),
        ];
        rows.extend(
            fields
                .into_iter()
                .filter_map(|(label, value)| value.map(|value| ExportRow::info("Document", label, value))),
        );
    }

    if let Some(media) = metadata.media_metadata.data() {
        if let Some(length) = media.stream.as_ref().and_then(|stream| stream.length) {
            rows.push(ExportRow::info("Media", "Length (s)", format!("{length:.2}")));
        }
        rows.extend(
            media
                .tags
                .iter()
                .map(|(key, value)| ExportRow::info("Media", key.as_str(), value.as_str())),
        );
    }

    if let Some(analysis) = &report.analysis {
        rows.push(ExportRow {
            section: "Analysis",
            label: "Risk Level".to_string(),
            value: analysis.risk_level.to_string(),
            level: analysis.risk_level.to_string(),
        });
        for anomaly in &analysis.anomalies {
            rows.push(ExportRow {
                section: "Anomalies",
                label: anomaly.kind.to_string(),
                value: anomaly.description.clone(),
                level: anomaly.severity.to_string(),
            });
        }
        for concern in &analysis.privacy_concerns {
            rows.push(ExportRow {
                section: "Privacy Concerns",
                label: concern.kind.to_string(),
                value: concern.description.clone(),
                level: concern.severity.to_string(),
            });
        }
        for indicator in &analysis.forensic_indicators {
            rows.push(ExportRow::info(
                "Forensic Indicators",
                indicator.kind.to_string(),
                indicator.value.as_str(),
            ));
        }
        for finding in &analysis.findings {
            rows.push(ExportRow {
                section: "Findings",
                label: finding.kind.to_string(),
                value: finding.description.clone(),
                level: finding.severity.to_string(),
            });
        }
        for recommendation in analysis.recommendations() {
            rows.push(ExportRow::info("Recommendations", "Recommendation", recommendation));
        }
    }

    rows
}
