use crate::analysis::findings::{Findings, PrivacyConcernKind, Severity};
use crate::analysis::input::ExifData;

pub(crate) fn check_device_information(exif: &ExifData, findings: &mut Findings) {
    let make = exif.lookup("Make");
    let model = exif.lookup("Model");

    if make.is_some() || model.is_some() {
        let device = [make, model].into_iter().flatten().collect::<Vec<_>>().join(" ");
        findings.privacy_concern(
            PrivacyConcernKind::DeviceInformation,
            Severity::Low,
            format!("File contains device info: {device}"),
            "Device information can be used for fingerprinting",
        );
    }

    if let Some(software) = exif.lookup("Software") {
        findings.privacy_concern(
            PrivacyConcernKind::SoftwareInformation,
            Severity::Low,
            format!("File contains software info: {software}"),
            "Software metadata can reveal editing tools used",
        );
    }
}
