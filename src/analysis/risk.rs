//! Agregacion del riesgo y recomendaciones derivadas de los hallazgos.

use crate::analysis::findings::{
    Anomaly, AnomalyKind, PrivacyConcern, PrivacyConcernKind, RiskLevel, Severity,
};

/// Anomalias HIGH toleradas antes de escalar a CRITICAL.
const HIGH_ANOMALY_ESCALATION: usize = 2;
/// Preocupaciones a partir de las cuales se sugiere sanitizar.
const SANITIZATION_THRESHOLD: usize = 5;

pub const RECOMMEND_REMOVE_GPS: &str = "Remove GPS coordinates before sharing photos online";
pub const RECOMMEND_STRIP_AUTHOR: &str = "Strip author metadata from documents before distribution";
pub const RECOMMEND_INVESTIGATE_TIMESTAMPS: &str = "Investigate potential timestamp manipulation";
pub const RECOMMEND_SANITIZE: &str = "Consider using metadata sanitization tools";
pub const NO_CRITICAL_CONCERNS: &str = "No critical privacy concerns detected.";

/// Nivel de riesgo; la primera regla que se cumple gana.
pub fn calculate_risk_level(anomalies: &[Anomaly], concerns: &[PrivacyConcern]) -> RiskLevel {
    let concerns_with = |severity: Severity| {
        concerns
            .iter()
            .filter(|concern| concern.severity == severity)
            .count()
    };
    let high_anomalies = anomalies
        .iter()
        .filter(|anomaly| anomaly.severity == Severity::High)
        .count();

    if concerns_with(Severity::Critical) > 0 || high_anomalies > HIGH_ANOMALY_ESCALATION {
        RiskLevel::Critical
    } else if concerns_with(Severity::High) > 0 || high_anomalies > 0 {
        RiskLevel::High
    } else if !concerns.is_empty() {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn recommendations(anomalies: &[Anomaly], concerns: &[PrivacyConcern]) -> Vec<&'static str> {
    let has_concern = |kind: PrivacyConcernKind| concerns.iter().any(|concern| concern.kind == kind);

    let mut recommendations = Vec::new();
    if has_concern(PrivacyConcernKind::GpsLocation) {
        recommendations.push(RECOMMEND_REMOVE_GPS);
    }
    if has_concern(PrivacyConcernKind::AuthorInformation) {
        recommendations.push(RECOMMEND_STRIP_AUTHOR);
    }
    if anomalies
        .iter()
        .any(|anomaly| anomaly.kind == AnomalyKind::TimestampAnomaly)
    {
        recommendations.push(RECOMMEND_INVESTIGATE_TIMESTAMPS);
    }
    if concerns.len() > SANITIZATION_THRESHOLD {
        recommendations.push(RECOMMEND_SANITIZE);
    }

    if recommendations.is_empty() {
        recommendations.push(NO_CRITICAL_CONCERNS);
    }
    recommendations
}
