use crate::analysis::findings::{Findings, IndicatorKind};
use crate::analysis::input::FileInfo;

pub(crate) fn generate_hash_indicators(file_info: &FileInfo, findings: &mut Findings) {
    let hashes = [
        ("md5_hash", file_info.md5_hash.as_deref()),
        ("sha256_hash", file_info.sha256_hash.as_deref()),
    ];

    for (name, value) in hashes {
        if let Some(value) = value {
            findings.indicator(
                IndicatorKind::FileHash,
                format!("{}: {value}", name.to_uppercase()),
                "Cryptographic fingerprint for file integrity verification",
            );
        }
    }
}
