use crate::analysis::findings::{Findings, IndicatorKind, PrivacyConcernKind, Severity};
use crate::analysis::input::GpsData;
use crate::formatting::format_decimal;

pub(crate) fn analyze_gps_data(gps: &GpsData, findings: &mut Findings) {
    let Some((latitude, longitude)) = gps.coordinates_decimal() else {
        return;
    };

    let coordinates = format!(
        "{}, {}",
        format_decimal(latitude),
        format_decimal(longitude)
    );

    findings.privacy_concern(
        PrivacyConcernKind::GpsLocation,
        Severity::Critical,
        format!("Image contains GPS coordinates: {coordinates}"),
        "Remove GPS data before sharing to protect location privacy",
    );
    findings.indicator(
        IndicatorKind::Geolocation,
        coordinates,
        "Can pinpoint exact location where photo was taken",
    );

    if let Some(altitude) = gps.altitude_meters {
        findings.indicator(
            IndicatorKind::Altitude,
            format!("{} meters", format_decimal(altitude)),
            "Additional location context (elevation)",
        );
    }
}
