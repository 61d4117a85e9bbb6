use crate::analysis::findings::{Findings, IndicatorKind};
use crate::analysis::input::MediaMetadata;

const REVEALING_TAGS: [&str; 4] = ["artist", "album", "title", "comment"];

pub(crate) fn analyze_media_properties(media: &MediaMetadata, findings: &mut Findings) {
    if let Some(length) = media.stream.as_ref().and_then(|stream| stream.length) {
        findings.indicator(
            IndicatorKind::MediaDuration,
            format!("{length:.2} seconds"),
            "Original recording length",
        );
    }

    for key in REVEALING_TAGS {
        if let Some(value) = media.tags.get(key) {
            findings.indicator(
                IndicatorKind::MediaTag,
                format!("{key}: {value}"),
                "Embedded metadata may reveal origin",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::input::StreamProperties;

    #[test]
    fn duration_uses_two_decimals() {
        let mut findings = Findings::default();
        let media = MediaMetadata {
            stream: Some(StreamProperties {
                length: Some(183.4567),
                ..StreamProperties::default()
            }),
            ..MediaMetadata::default()
        };
        analyze_media_properties(&media, &mut findings);

        assert_eq!(findings.forensic_indicators().len(), 1);
        assert_eq!(
            findings.forensic_indicators()[0].kind,
            IndicatorKind::MediaDuration
        );
        assert_eq!(findings.forensic_indicators()[0].value, "183.46 seconds");
    }

    #[test]
    fn tags_follow_fixed_order() {
        let mut findings = Findings::default();
        let mut media = MediaMetadata::default();
        media.tags.insert("title".to_string(), "Field Notes".to_string());
        media.tags.insert("artist".to_string(), "J. Smith".to_string());
        media.tags.insert("genre".to_string(), "Spoken".to_string());
        analyze_media_properties(&media, &mut findings);

        let values: Vec<&str> = findings
            .forensic_indicators()
            .iter()
            .map(|indicator| indicator.value.as_str())
            .collect();
        assert_eq!(values, vec!["artist: J. Smith", "title: Field Notes"]);
    }
}
