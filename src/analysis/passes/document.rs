use crate::analysis::findings::{Findings, IndicatorKind, PrivacyConcernKind, Severity};
use crate::analysis::input::DocumentMetadata;

pub(crate) fn analyze_document_properties(document: &DocumentMetadata, findings: &mut Findings) {
    if let Some(author) = document.author.as_deref().or(document.creator.as_deref()) {
        findings.privacy_concern(
            PrivacyConcernKind::AuthorInformation,
            Severity::Medium,
            format!("Document contains author information: {author}"),
            "Remove author metadata before sharing",
        );
        findings.indicator(
            IndicatorKind::Authorship,
            author,
            "Can be used to attribute document creation",
        );
    }

    for (_, value) in document.organization_fields() {
        if let Some(value) = value {
            findings.privacy_concern(
                PrivacyConcernKind::OrganizationInfo,
                Severity::Medium,
                format!("Document contains organization info: {value}"),
                "Remove organizational metadata",
            );
        }
    }

    if let Some(revision) = document.revision.filter(|revision| *revision > 1) {
        findings.indicator(
            IndicatorKind::RevisionCount,
            revision.to_string(),
            format!("Document has been revised {revision} times"),
        );
    }

    if document.comments.is_some() {
        findings.privacy_concern(
            PrivacyConcernKind::EmbeddedComments,
            Severity::High,
            "Document contains embedded comments",
            "Review and remove sensitive comments",
        );
    }

    if let Some(keywords) = document.keywords.as_deref() {
        findings.indicator(
            IndicatorKind::Keywords,
            keywords,
            "May reveal document classification or purpose",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_yields_concern_and_indicator() {
        let mut findings = Findings::default();
        let document = DocumentMetadata {
            author: Some("Jane Doe".to_string()),
            ..DocumentMetadata::default()
        };
        analyze_document_properties(&document, &mut findings);

        assert_eq!(findings.privacy_concerns().len(), 1);
        let concern = &findings.privacy_concerns()[0];
        assert_eq!(concern.kind, PrivacyConcernKind::AuthorInformation);
        assert_eq!(concern.severity, Severity::Medium);
        assert_eq!(
            concern.description,
            "Document contains author information: Jane Doe"
        );

        assert_eq!(findings.forensic_indicators().len(), 1);
        assert_eq!(findings.forensic_indicators()[0].kind, IndicatorKind::Authorship);
        assert_eq!(findings.forensic_indicators()[0].value, "Jane Doe");
    }

    #[test]
    fn creator_is_used_when_author_missing() {
        let mut findings = Findings::default();
        let document = DocumentMetadata {
            creator: Some("Writer 3000".to_string()),
            ..DocumentMetadata::default()
        };
        analyze_document_properties(&document, &mut findings);

        assert_eq!(findings.forensic_indicators()[0].value, "Writer 3000");
    }

    #[test]
    fn each_organization_field_is_reported() {
        let mut findings = Findings::default();
        let document = DocumentMetadata {
            company: Some("Acme".to_string()),
            category: Some("Internal".to_string()),
            ..DocumentMetadata::default()
        };
        analyze_document_properties(&document, &mut findings);

        let descriptions: Vec<&str> = findings
            .privacy_concerns()
            .iter()
            .map(|concern| concern.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "Document contains organization info: Acme",
                "Document contains organization info: Internal",
            ]
        );
    }

    #[test]
    fn revision_only_counts_above_one() {
        let mut findings = Findings::default();
        let document = DocumentMetadata {
            revision: Some(1),
            ..DocumentMetadata::default()
        };
        analyze_document_properties(&document, &mut findings);
        assert!(findings.forensic_indicators().is_empty());

        let document = DocumentMetadata {
            revision: Some(4),
            ..DocumentMetadata::default()
        };
        analyze_document_properties(&document, &mut findings);
        assert_eq!(findings.forensic_indicators().len(), 1);
        assert_eq!(
            findings.forensic_indicators()[0].significance,
            "Document has been revised 4 times"
        );
    }

    #[test]
    fn comments_are_high_and_keywords_are_indicators() {
        let mut findings = Findings::default();
        let document = DocumentMetadata {
            comments: Some("check salary figures".to_string()),
            keywords: Some("confidential, q3".to_string()),
            ..DocumentMetadata::default()
        };
        analyze_document_properties(&document, &mut findings);

        assert_eq!(findings.privacy_concerns().len(), 1);
        assert_eq!(
            findings.privacy_concerns()[0].kind,
            PrivacyConcernKind::EmbeddedComments
        );
        assert_eq!(findings.privacy_concerns()[0].severity, Severity::High);
        assert_eq!(findings.forensic_indicators()[0].kind, IndicatorKind::Keywords);
        assert_eq!(findings.forensic_indicators()[0].value, "confidential, q3");
    }
}
