//! Motor de analisis de metadatos.
//!
//! Recorre la estructura producida por la extraccion con un conjunto fijo de
//! pasadas basadas en reglas y devuelve anomalias, preocupaciones de
//! privacidad, indicadores forenses, hallazgos y un nivel de riesgo
//! agregado. El motor no realiza E/S: opera sobre un [`MetadataInput`] ya
//! construido en memoria.

pub mod findings;
pub mod input;
mod passes;
pub mod risk;
pub mod timestamp;

use chrono::{Local, NaiveDateTime};
use findings::Findings;
use input::{MetadataInput, Section};

pub use findings::{
    AnalysisResult, Anomaly, AnomalyKind, Finding, FindingKind, ForensicIndicator,
    IndicatorKind, PrivacyConcern, PrivacyConcernKind, RiskLevel, Severity, Summary,
};
pub use input::FileType;
pub use risk::calculate_risk_level;
pub use timestamp::{TimestampError, parse_timestamp};

/// Analizador de un unico archivo. `analyze` consume el valor, de modo que
/// cada instancia produce exactamente un resultado.
#[derive(Debug)]
pub struct MetadataAnalyzer<'a> {
    input: &'a MetadataInput,
    reference_time: NaiveDateTime,
}

impl<'a> MetadataAnalyzer<'a> {
    pub fn new(input: &'a MetadataInput) -> Self {
        Self {
            input,
            reference_time: Local::now().naive_local(),
        }
    }

    /// Fija el instante usado para calcular antiguedades y `analyzed_at`.
    pub fn with_reference_time(mut self, reference_time: NaiveDateTime) -> Self {
        self.reference_time = reference_time;
        self
    }

    pub fn analyze(self) -> AnalysisResult {
        let input = self.input;
        let mut findings = Findings::default();

        if let Section::Present(file_info) = &input.file_info {
            passes::analyze_timestamps(file_info, self.reference_time, &mut findings);
        }
        trace_pass("marcas de tiempo", &findings);

        if let Section::Present(file_info) = &input.file_info {
            passes::analyze_file_system(file_info, &mut findings);
        }
        trace_pass("sistema de archivos", &findings);

        if let Some(document) = input.document_metadata.data() {
            passes::analyze_document_properties(document, &mut findings);
        }
        trace_pass("documento", &findings);

        if let Some(gps) = input.gps_data.data() {
            passes::analyze_gps_data(gps, &mut findings);
        }
        trace_pass("gps", &findings);

        if let Some(media) = input.media_metadata.data() {
            passes::analyze_media_properties(media, &mut findings);
        }
        trace_pass("multimedia", &findings);

        if let Some(exif) = input.exif_data.data() {
            passes::check_device_information(exif, &mut findings);
        }
        trace_pass("dispositivo", &findings);

        if let Some(file_info) = input.file_info.data() {
            passes::generate_hash_indicators(file_info, &mut findings);
        }
        trace_pass("hashes", &findings);

        let (anomalies, privacy_concerns, forensic_indicators, findings) = findings.into_parts();
        let risk_level = calculate_risk_level(&anomalies, &privacy_concerns);

        let summary = Summary {
            total_anomalies: anomalies.len(),
            total_privacy_concerns: privacy_concerns.len(),
            total_forensic_indicators: forensic_indicators.len(),
            total_findings: findings.len(),
            file_type: input.file_type,
            has_gps: input
                .gps_data
                .data()
                .is_some_and(|gps| gps.coordinates_decimal().is_some()),
            has_author_info: input
                .document_metadata
                .data()
                .is_some_and(|document| document.author.is_some()),
            analyzed_at: self.reference_time,
        };

        tracing::debug!(risk = %risk_level, "analisis completado");

        AnalysisResult {
            summary,
            anomalies,
            privacy_concerns,
            forensic_indicators,
            findings,
            risk_level,
        }
    }
}

/// Analiza la entrada con la hora actual como referencia.
pub fn analyze(input: &MetadataInput) -> AnalysisResult {
    MetadataAnalyzer::new(input).analyze()
}

fn trace_pass(pass: &str, findings: &Findings) {
    tracing::debug!(
        pass,
        anomalies = findings.anomalies().len(),
        privacy_concerns = findings.privacy_concerns().len(),
        forensic_indicators = findings.forensic_indicators().len(),
        findings = findings.findings().len(),
        "pasada completada"
    );
}
