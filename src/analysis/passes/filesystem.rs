use crate::analysis::findings::{AnomalyKind, FindingKind, Findings, Severity};
use crate::analysis::input::FileInfo;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Patrones de nombre sospechosos, en orden de prioridad.
const SUSPICIOUS_PATTERNS: [&str; 6] = [r"copy\s+of", "backup", "tmp", "temp", r"~\$", r"^\."];

static SUSPICIOUS_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SUSPICIOUS_PATTERNS
        .iter()
        .map(|pattern| {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("los patrones de nombre son expresiones validas");
            (*pattern, regex)
        })
        .collect()
});

pub(crate) fn analyze_file_system(file_info: &FileInfo, findings: &mut Findings) {
    if file_info.size_bytes == Some(0) {
        findings.anomaly(
            AnomalyKind::EmptyFile,
            Severity::Medium,
            "File is empty (0 bytes)",
            None,
            "Possible data wiping or placeholder file",
        );
    }

    let Some(filename) = file_info.filename.as_deref() else {
        return;
    };

    if let Some(pattern) = suspicious_pattern(filename) {
        findings.finding(
            FindingKind::SuspiciousFilename,
            Severity::Low,
            format!("Filename contains suspicious pattern: {pattern}"),
            Some("May indicate temporary, backup, or hidden file"),
        );
    }
}

/// Primer patron sospechoso presente en el nombre, si existe.
fn suspicious_pattern(filename: &str) -> Option<&'static str> {
    SUSPICIOUS_MATCHERS
        .iter()
        .find(|(_, regex)| regex.is_match(filename))
        .map(|(pattern, _)| *pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(filename: &str, size_bytes: u64) -> FileInfo {
        FileInfo {
            filename: Some(filename.to_string()),
            size_bytes: Some(size_bytes),
            ..FileInfo::default()
        }
    }

    #[test]
    fn empty_file_is_medium_anomaly() {
        let mut findings = Findings::default();
        analyze_file_system(&named("report.pdf", 0), &mut findings);

        assert_eq!(findings.anomalies().len(), 1);
        assert_eq!(findings.anomalies()[0].kind, AnomalyKind::EmptyFile);
        assert_eq!(findings.anomalies()[0].severity, Severity::Medium);
    }

    #[test]
    fn unknown_size_is_not_treated_as_empty() {
        let mut findings = Findings::default();
        let info = FileInfo {
            filename: Some("report.pdf".to_string()),
            ..FileInfo::default()
        };
        analyze_file_system(&info, &mut findings);

        assert!(findings.anomalies().is_empty());
    }

    #[test]
    fn copy_of_matches_once_case_insensitively() {
        let mut findings = Findings::default();
        analyze_file_system(&named("Copy of report.docx", 10), &mut findings);

        assert_eq!(findings.findings().len(), 1);
        assert_eq!(findings.findings()[0].kind, FindingKind::SuspiciousFilename);
        assert_eq!(
            findings.findings()[0].description,
            r"Filename contains suspicious pattern: copy\s+of"
        );
    }

    #[test]
    fn only_first_pattern_is_reported() {
        assert_eq!(suspicious_pattern("BACKUP_temp.tmp"), Some("backup"));
        assert_eq!(suspicious_pattern("~$draft.docx"), Some(r"~\$"));
        assert_eq!(suspicious_pattern(".hidden"), Some(r"^\."));
        assert_eq!(suspicious_pattern("notes.txt"), None);
    }

    #[test]
    fn clean_name_produces_nothing() {
        let mut findings = Findings::default();
        analyze_file_system(&named("holiday.jpg", 2048), &mut findings);

        assert!(findings.anomalies().is_empty());
        assert!(findings.findings().is_empty());
    }
}
