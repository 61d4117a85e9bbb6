//! Metadata del sistema de archivos y hashes del contenido.

use super::ExtractOptions;
use crate::analysis::input::FileInfo;
use crate::formatting::{format_iso, format_size, format_system_time};
use md5::Md5;
use sha2::{Digest, Sha256};
use std::fs::{File, Metadata};
use std::io::{self, Read};
use std::path::Path;

pub const HASH_SIZE_LIMIT: u64 = 32 * 1024 * 1024; // 32 MiB

const COPY_NOTE: &str = "File system dates may differ from original dates if file was copied/moved";

pub(super) fn collect(path: &Path, stats: &Metadata, options: &ExtractOptions) -> FileInfo {
    let full_path = std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();

    let mut info = FileInfo {
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        full_path: Some(full_path),
        extension: path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy())),
        size_bytes: Some(stats.len()),
        size_human: Some(format_size(stats.len())),
        created: created_time(stats),
        modified: stats.modified().ok().map(format_system_time),
        accessed: stats.accessed().ok().map(format_system_time),
        note: Some(COPY_NOTE.to_string()),
        ..FileInfo::default()
    };

    if options.include_hash {
        if stats.len() > options.hash_size_limit {
            tracing::warn!(
                path = %path.display(),
                size = stats.len(),
                limit = options.hash_size_limit,
                "archivo demasiado grande, se omiten los hashes"
            );
        } else {
            match file_hashes(path) {
                Ok(HashSummary { md5, sha256 }) => {
                    info.md5_hash = Some(md5);
                    info.sha256_hash = Some(sha256);
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "no se pudieron calcular los hashes");
                }
            }
        }
    }

    info
}

/// Fecha de creacion; en Unix sin fecha de nacimiento se usa el cambio de inodo.
fn created_time(stats: &Metadata) -> Option<String> {
    if let Ok(created) = stats.created() {
        return Some(format_system_time(created));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let nanos = u32::try_from(stats.ctime_nsec()).unwrap_or(0);
        chrono::DateTime::from_timestamp(stats.ctime(), nanos)
            .map(|datetime| format_iso(datetime.with_timezone(&chrono::Local).naive_local()))
    }

    #[cfg(not(unix))]
    {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashSummary {
    pub md5: String,
    pub sha256: String,
}

/// Calcula MD5 y SHA-256 en una sola lectura del archivo.
pub fn file_hashes(path: &Path) -> io::Result<HashSummary> {
    let mut file = File::open(path)?;

    let mut md5 = Md5::new();
    let mut sha256 = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        md5.update(&buffer[..bytes_read]);
        sha256.update(&buffer[..bytes_read]);
    }

    Ok(HashSummary {
        md5: format!("{:x}", md5.finalize()),
        sha256: format!("{:x}", sha256.finalize()),
    })
}
