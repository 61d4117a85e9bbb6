//! Hallazgos que produce el motor y el resultado agregado de un analisis.

use super::input::FileType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nivel de riesgo ordinal del archivo completo.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    TimestampAnomaly,
    EmptyFile,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyConcernKind {
    AuthorInformation,
    OrganizationInfo,
    EmbeddedComments,
    GpsLocation,
    DeviceInformation,
    SoftwareInformation,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Authorship,
    RevisionCount,
    Keywords,
    Geolocation,
    Altitude,
    MediaDuration,
    MediaTag,
    FileHash,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    TimestampMatch,
    OldFileRecentAccess,
    TimestampError,
    SuspiciousFilename,
}

impl AnomalyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyKind::TimestampAnomaly => "TIMESTAMP_ANOMALY",
            AnomalyKind::EmptyFile => "EMPTY_FILE",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PrivacyConcernKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrivacyConcernKind::AuthorInformation => "AUTHOR_INFORMATION",
            PrivacyConcernKind::OrganizationInfo => "ORGANIZATION_INFO",
            PrivacyConcernKind::EmbeddedComments => "EMBEDDED_COMMENTS",
            PrivacyConcernKind::GpsLocation => "GPS_LOCATION",
            PrivacyConcernKind::DeviceInformation => "DEVICE_INFORMATION",
            PrivacyConcernKind::SoftwareInformation => "SOFTWARE_INFORMATION",
        }
    }
}

impl fmt::Display for PrivacyConcernKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IndicatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorKind::Authorship => "AUTHORSHIP",
            IndicatorKind::RevisionCount => "REVISION_COUNT",
            IndicatorKind::Keywords => "KEYWORDS",
            IndicatorKind::Geolocation => "GEOLOCATION",
            IndicatorKind::Altitude => "ALTITUDE",
            IndicatorKind::MediaDuration => "MEDIA_DURATION",
            IndicatorKind::MediaTag => "MEDIA_TAG",
            IndicatorKind::FileHash => "FILE_HASH",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::TimestampMatch => "TIMESTAMP_MATCH",
            FindingKind::OldFileRecentAccess => "OLD_FILE_RECENT_ACCESS",
            FindingKind::TimestampError => "TIMESTAMP_ERROR",
            FindingKind::SuspiciousFilename => "SUSPICIOUS_FILENAME",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inconsistencia que sugiere manipulacion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub forensic_significance: String,
}

/// Exposicion de informacion con su recomendacion de remediacion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrivacyConcern {
    #[serde(rename = "type")]
    pub kind: PrivacyConcernKind,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

/// Hecho neutral de interes investigativo, sin severidad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForensicIndicator {
    #[serde(rename = "type")]
    pub kind: IndicatorKind,
    pub value: String,
    pub significance: String,
}

/// Nota de baja prioridad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forensic_significance: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_anomalies: usize,
    pub total_privacy_concerns: usize,
    pub total_forensic_indicators: usize,
    pub total_findings: usize,
    pub file_type: Option<FileType>,
    pub has_gps: bool,
    pub has_author_info: bool,
    pub analyzed_at: NaiveDateTime,
}

/// Resultado completo de un analisis. Es inmutable una vez construido.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub anomalies: Vec<Anomaly>,
    pub privacy_concerns: Vec<PrivacyConcern>,
    pub forensic_indicators: Vec<ForensicIndicator>,
    pub findings: Vec<Finding>,
    pub risk_level: RiskLevel,
}

impl AnalysisResult {
    pub fn recommendations(&self) -> Vec<&'static str> {
        super::risk::recommendations(&self.anomalies, &self.privacy_concerns)
    }
}

/// Acumulador de hallazgos compartido por todas las pasadas de un analisis.
/// Solo admite anexar.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    anomalies: Vec<Anomaly>,
    privacy_concerns: Vec<PrivacyConcern>,
    forensic_indicators: Vec<ForensicIndicator>,
    findings: Vec<Finding>,
}

impl Findings {
    pub(crate) fn anomaly(
        &mut self,
        kind: AnomalyKind,
        severity: Severity,
        description: impl Into<String>,
        details: Option<String>,
        forensic_significance: impl Into<String>,
    ) {
        self.anomalies.push(Anomaly {
            kind,
            severity,
            description: description.into(),
            details,
            forensic_significance: forensic_significance.into(),
        });
    }

    pub(crate) fn privacy_concern(
        &mut self,
        kind: PrivacyConcernKind,
        severity: Severity,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) {
        self.privacy_concerns.push(PrivacyConcern {
            kind,
            severity,
            description: description.into(),
            recommendation: recommendation.into(),
        });
    }

    pub(crate) fn indicator(
        &mut self,
        kind: IndicatorKind,
        value: impl Into<String>,
        significance: impl Into<String>,
    ) {
        self.forensic_indicators.push(ForensicIndicator {
            kind,
            value: value.into(),
            significance: significance.into(),
        });
    }

    pub(crate) fn finding(
        &mut self,
        kind: FindingKind,
        severity: Severity,
        description: impl Into<String>,
        forensic_significance: Option<&str>,
    ) {
        self.findings.push(Finding {
            kind,
            severity,
            description: description.into(),
            forensic_significance: forensic_significance.map(str::to_string),
        });
    }

    pub(crate) fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub(crate) fn privacy_concerns(&self) -> &[PrivacyConcern] {
        &self.privacy_concerns
    }

    pub(crate) fn forensic_indicators(&self) -> &[ForensicIndicator] {
        &self.forensic_indicators
    }

    pub(crate) fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<Anomaly>,
        Vec<PrivacyConcern>,
        Vec<ForensicIndicator>,
        Vec<Finding>,
    ) {
        (
            self.anomalies,
            self.privacy_concerns,
            self.forensic_indicators,
            self.findings,
        )
    }
}
