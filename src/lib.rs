//! FileLens Forensics: extraccion de metadata, analisis forense basado en
//! reglas, generacion de reportes y limpieza de metadata.
//!
//! El nucleo es [`analysis`]; [`extraction`], [`report`], [`discovery`] y
//! [`sanitize`] son colaboradores delgados sobre crates del ecosistema.

pub mod analysis;
pub mod discovery;
pub mod error;
pub mod extraction;
pub mod formatting;
pub mod logging;
pub mod report;
pub mod sanitize;

pub use analysis::{AnalysisResult, MetadataAnalyzer, RiskLevel, analyze};
pub use analysis::input::MetadataInput;
pub use error::{ExtractError, ReportError, SanitizeError};
pub use extraction::{ExtractOptions, extract_metadata};
pub use report::{ExportFormat, Report};
pub use sanitize::{SanitizeOutcome, SanitizeSummary, sanitize_directory, sanitize_file};
