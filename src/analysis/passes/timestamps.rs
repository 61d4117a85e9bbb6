use crate::analysis::findings::{AnomalyKind, FindingKind, Findings, Severity};
use crate::analysis::input::FileInfo;
use crate::analysis::timestamp::{TimestampError, elapsed_days, parse_timestamp};
use chrono::NaiveDateTime;

const OLD_FILE_DAYS: i64 = 365;

struct Timeline {
    created: NaiveDateTime,
    modified: NaiveDateTime,
    accessed: NaiveDateTime,
}

impl Timeline {
    fn parse(file_info: &FileInfo) -> Result<Self, TimestampError> {
        Ok(Self {
            created: parse_timestamp("created", file_info.created.as_deref())?,
            modified: parse_timestamp("modified", file_info.modified.as_deref())?,
            accessed: parse_timestamp("accessed", file_info.accessed.as_deref())?,
        })
    }
}

pub(crate) fn analyze_timestamps(file_info: &FileInfo, now: NaiveDateTime, findings: &mut Findings) {
    let timeline = match Timeline::parse(file_info) {
        Ok(timeline) => timeline,
        Err(error) => {
            tracing::debug!(%error, "no se pudieron interpretar las marcas de tiempo");
            findings.finding(
                FindingKind::TimestampError,
                Severity::Low,
                format!("Error analyzing timestamps: {error}"),
                None,
            );
            return;
        }
    };

    let Timeline {
        created,
        modified,
        accessed,
    } = timeline;

    if modified < created {
        findings.anomaly(
            AnomalyKind::TimestampAnomaly,
            Severity::High,
            "Modified time is before creation time",
            Some(format!("Created: {created}, Modified: {modified}")),
            "Possible timestamp manipulation or system clock issues",
        );
    }

    if accessed < created {
        findings.anomaly(
            AnomalyKind::TimestampAnomaly,
            Severity::High,
            "Access time is before creation time",
            Some(format!("Created: {created}, Accessed: {accessed}")),
            "Strong indicator of timestamp tampering",
        );
    }

    if created == modified {
        findings.finding(
            FindingKind::TimestampMatch,
            Severity::Low,
            "Creation and modification times are identical",
            Some("File may never have been edited, or timestamps were synchronized"),
        );
    }

    let file_age = elapsed_days(created, now);
    let last_access_age = elapsed_days(accessed, now);
    if file_age > OLD_FILE_DAYS && last_access_age < 1 {
        findings.finding(
            FindingKind::OldFileRecentAccess,
            Severity::Medium,
            format!("File is {file_age} days old but was accessed recently"),
            Some("May indicate recent interest in old evidence"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("fecha valida")
    }

    fn file_info(created: &str, modified: &str, accessed: &str) -> FileInfo {
        FileInfo {
            created: Some(created.to_string()),
            modified: Some(modified.to_string()),
            accessed: Some(accessed.to_string()),
            ..FileInfo::default()
        }
    }

    #[test]
    fn modified_before_created_is_high_anomaly() {
        let mut findings = Findings::default();
        analyze_timestamps(
            &file_info(
                "2024-01-01T00:00:00",
                "2023-01-01T00:00:00",
                "2024-06-01T00:00:00",
            ),
            now(),
            &mut findings,
        );

        assert_eq!(findings.anomalies().len(), 1);
        let anomaly = &findings.anomalies()[0];
        assert_eq!(anomaly.kind, AnomalyKind::TimestampAnomaly);
        assert_eq!(anomaly.severity, Severity::High);
        assert_eq!(anomaly.description, "Modified time is before creation time");
        assert_eq!(
            anomaly.details.as_deref(),
            Some("Created: 2024-01-01 00:00:00, Modified: 2023-01-01 00:00:00")
        );
    }

    #[test]
    fn both_orderings_can_fire_together() {
        let mut findings = Findings::default();
        analyze_timestamps(
            &file_info(
                "2024-01-01T00:00:00",
                "2023-01-01T00:00:00",
                "2023-06-01T00:00:00",
            ),
            now(),
            &mut findings,
        );

        assert_eq!(findings.anomalies().len(), 2);
        assert_eq!(
            findings.anomalies()[1].forensic_significance,
            "Strong indicator of timestamp tampering"
        );
    }

    #[test]
    fn identical_creation_and_modification_is_noted() {
        let mut findings = Findings::default();
        analyze_timestamps(
            &file_info(
                "2024-03-01T10:00:00",
                "2024-03-01T10:00:00",
                "2024-03-02T10:00:00",
            ),
            now(),
            &mut findings,
        );

        assert!(findings.anomalies().is_empty());
        assert_eq!(findings.findings().len(), 1);
        assert_eq!(findings.findings()[0].kind, FindingKind::TimestampMatch);
        assert_eq!(findings.findings()[0].severity, Severity::Low);
    }

    #[test]
    fn old_file_accessed_today_is_flagged() {
        let mut findings = Findings::default();
        analyze_timestamps(
            &file_info(
                "2020-01-01T00:00:00",
                "2020-02-01T00:00:00",
                "2025-01-01T08:00:00",
            ),
            now(),
            &mut findings,
        );

        let finding = findings
            .findings()
            .iter()
            .find(|finding| finding.kind == FindingKind::OldFileRecentAccess)
            .expect("hallazgo de acceso reciente");
        assert_eq!(finding.severity, Severity::Medium);
        assert_eq!(finding.description, "File is 1827 days old but was accessed recently");
    }

    #[test]
    fn exactly_one_year_old_is_not_old() {
        let mut findings = Findings::default();
        analyze_timestamps(
            &file_info(
                "2024-01-02T12:00:00",
                "2024-02-01T00:00:00",
                "2025-01-01T11:00:00",
            ),
            now(),
            &mut findings,
        );

        assert!(findings.findings().is_empty());
    }

    #[test]
    fn parse_failure_becomes_low_finding() {
        let mut findings = Findings::default();
        let info = FileInfo {
            created: Some("2024-01-01T00:00:00".to_string()),
            modified: Some("not a date".to_string()),
            ..FileInfo::default()
        };
        analyze_timestamps(&info, now(), &mut findings);

        assert!(findings.anomalies().is_empty());
        assert_eq!(findings.findings().len(), 1);
        let finding = &findings.findings()[0];
        assert_eq!(finding.kind, FindingKind::TimestampError);
        assert_eq!(finding.severity, Severity::Low);
        assert!(finding.description.starts_with("Error analyzing timestamps: "));
        assert!(finding.description.contains("modified"));
    }
}
