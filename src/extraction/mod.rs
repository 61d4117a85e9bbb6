//! Extraccion de metadata: convierte un archivo en un [`MetadataInput`].
//!
//! Cada formato se lee con un crate del ecosistema. Un problema al leer una
//! seccion concreta nunca aborta la extraccion: queda registrado como
//! [`Section::Failed`] y el resto del archivo se procesa igual.

pub(crate) mod document;
mod file_info;
mod image;
mod media;

use crate::analysis::input::{FileType, MetadataInput, Section};
use crate::error::ExtractError;
use crate::formatting::format_iso;
use chrono::Local;
use infer::Infer;
use std::fs;
use std::path::Path;

pub use file_info::HASH_SIZE_LIMIT;

const IMAGE_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "heic", "heif",
];
const DOCUMENT_EXTENSIONS: [&str; 7] = ["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx"];
const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "avi", "mov", "mkv", "flv", "wmv", "webm"];
const AUDIO_EXTENSIONS: [&str; 7] = ["mp3", "wav", "flac", "aac", "ogg", "m4a", "wma"];

/// Opciones de extraccion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Calcula MD5 y SHA-256 del contenido.
    pub include_hash: bool,
    /// Archivos mayores a este tamano no se hashean.
    pub hash_size_limit: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_hash: true,
            hash_size_limit: HASH_SIZE_LIMIT,
        }
    }
}

/// Categoria del archivo segun su extension.
pub fn file_type_for(path: &Path) -> FileType {
    let Some(extension) = lowercase_extension(path) else {
        return FileType::Unknown;
    };
    let extension = extension.as_str();

    if IMAGE_EXTENSIONS.contains(&extension) {
        FileType::Image
    } else if DOCUMENT_EXTENSIONS.contains(&extension) {
        FileType::Document
    } else if VIDEO_EXTENSIONS.contains(&extension) {
        FileType::Video
    } else if AUDIO_EXTENSIONS.contains(&extension) {
        FileType::Audio
    } else {
        FileType::Unknown
    }
}

pub fn is_supported(path: &Path) -> bool {
    file_type_for(path) != FileType::Unknown
}

/// Intenta detectar el tipo MIME del archivo a partir de su contenido.
pub fn mime_type(path: &Path) -> Option<String> {
    let infer = Infer::new();
    infer
        .get_from_path(path)
        .ok()
        .flatten()
        .map(|kind| kind.mime_type().to_string())
}

pub fn extract_metadata(path: &Path, options: &ExtractOptions) -> Result<MetadataInput, ExtractError> {
    let stats = fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ExtractError::NotFound(path.to_path_buf())
        } else {
            ExtractError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    if !stats.is_file() {
        return Err(ExtractError::NotAFile(path.to_path_buf()));
    }

    let file_type = file_type_for(path);
    tracing::debug!(path = %path.display(), file_type = file_type.as_str(), "extrayendo metadata");

    let mut input = MetadataInput {
        file_info: Section::Present(file_info::collect(path, &stats, options)),
        file_type: Some(file_type),
        mime_type: mime_type(path),
        extraction_time: Some(format_iso(Local::now().naive_local())),
        ..MetadataInput::default()
    };

    match file_type {
        FileType::Image => {
            let image = image::extract(path);
            input.image_metadata = image.properties;
            input.exif_data = image.exif;
            input.gps_data = image.gps;
        }
        FileType::Document => {
            input.document_metadata = document::extract(path);
        }
        FileType::Video | FileType::Audio => {
            input.media_metadata = media::extract(path);
        }
        FileType::Unknown => {}
    }

    for (section, error) in [
        ("image_metadata", input.image_metadata.error()),
        ("exif_data", input.exif_data.error()),
        ("gps_data", input.gps_data.error()),
        ("document_metadata", input.document_metadata.error()),
        ("media_metadata", input.media_metadata.error()),
    ] {
        if let Some(error) = error {
            tracing::warn!(section, %error, path = %path.display(), "seccion no disponible");
        }
    }

    Ok(input)
}

pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
