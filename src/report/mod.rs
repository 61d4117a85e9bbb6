//! Reportes de metadata y analisis en distintos formatos.

mod flat;
mod kml;
mod sheet;
mod text;

use crate::analysis::AnalysisResult;
use crate::analysis::input::MetadataInput;
use crate::error::ReportError;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub use kml::export_kml;

pub const REPORT_TYPE: &str = "File Metadata Analysis";
pub const REPORT_VERSION: &str = "1.0.0";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportInfo {
    pub generated_at: NaiveDateTime,
    pub report_type: &'static str,
    pub version: &'static str,
}

/// Metadata extraida junto con su analisis opcional.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub report_info: ReportInfo,
    pub metadata: MetadataInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

impl Report {
    pub fn new(metadata: MetadataInput, analysis: Option<AnalysisResult>) -> Self {
        Self {
            report_info: ReportInfo {
                generated_at: Local::now().naive_local(),
                report_type: REPORT_TYPE,
                version: REPORT_VERSION,
            },
            metadata,
            analysis,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.metadata
            .file_info
            .data()
            .and_then(|info| info.filename.as_deref())
    }

    /// Nombre por defecto del reporte: `<archivo>_report.<ext>`.
    pub fn default_file_name(&self, format: ExportFormat) -> String {
        let stem = self
            .filename()
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
            .unwrap_or("metadata");
        format!("{stem}_report.{}", format.extension())
    }

    /// Si `target` es un directorio existente el reporte se guarda dentro con
    /// su nombre por defecto; si no, `target` es la ruta final.
    pub fn output_path(&self, target: &Path, format: ExportFormat) -> PathBuf {
        if target.is_dir() {
            target.join(self.default_file_name(format))
        } else {
            target.to_path_buf()
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportFormat {
    Json,
    Txt,
    Csv,
    Xlsx,
    Summary,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Txt | ExportFormat::Summary => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Txt => "TXT",
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Summary => "Resumen",
        }
    }
}

/// Genera un formato textual. XLSX solo puede escribirse a disco.
pub fn render(report: &Report, format: ExportFormat) -> Result<String, ReportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ExportFormat::Txt => Ok(text::full_report(report)),
        ExportFormat::Summary => Ok(text::summary(report)),
        ExportFormat::Csv => flat::csv_report(report),
        ExportFormat::Xlsx => Err(ReportError::BinaryFormat(format.label())),
    }
}

pub fn export_report(report: &Report, format: ExportFormat, path: &Path) -> Result<(), ReportError> {
    if format == ExportFormat::Xlsx {
        return sheet::export_xlsx(report, path);
    }

    let contents = render(report, format)?;
    fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), format = format.label(), "reporte exportado");
    Ok(())
}
