//! Limpieza de metadata: escribe una copia del archivo sin los campos que
//! identifican autor, dispositivo o ubicacion.
//!
//! El resultado se escribe primero en un temporal junto al destino, se
//! verifica releyendolo y solo entonces se renombra a su ruta final. Si la
//! verificacion falla el temporal se elimina y el destino no se toca.

mod image;
mod office;
mod pdf;

use crate::error::SanitizeError;
use crate::extraction::lowercase_extension;
use crate::formatting::format_size;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

const REPORT_RULE: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cleaner {
    Image,
    Office,
    Pdf,
}

impl Cleaner {
    fn for_path(path: &Path) -> Option<Self> {
        match lowercase_extension(path)?.as_str() {
            "jpg" | "jpeg" | "png" | "tif" | "tiff" => Some(Cleaner::Image),
            "docx" | "xlsx" | "pptx" => Some(Cleaner::Office),
            "pdf" => Some(Cleaner::Pdf),
            _ => None,
        }
    }

    fn clean(self, input: &Path, output: &Path) -> Result<bool, String> {
        match self {
            Cleaner::Image => image::clean(input, output),
            Cleaner::Office => office::clean(input, output),
            Cleaner::Pdf => pdf::clean(input, output),
        }
    }

    fn verify(self, path: &Path) -> Result<bool, String> {
        match self {
            Cleaner::Image => image::verify(path),
            Cleaner::Office => office::verify(path),
            Cleaner::Pdf => pdf::verify(path),
        }
    }
}

/// Indica si existe un limpiador para la extension del archivo.
pub fn is_sanitizable(path: &Path) -> bool {
    Cleaner::for_path(path).is_some()
}

/// Ruta por defecto de la copia limpia: `<nombre>_cleaned.<ext>` junto al original.
pub fn default_output_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    match input.extension() {
        Some(extension) => parent.join(format!("{stem}_cleaned.{}", extension.to_string_lossy())),
        None => parent.join(format!("{stem}_cleaned")),
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let stem = target.file_stem().unwrap_or_default().to_string_lossy();
    let extension = target.extension().unwrap_or_default().to_string_lossy();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);

    parent.join(format!(".{stem}_temp_{timestamp}.{extension}"))
}

/// Resultado de limpiar un archivo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SanitizeOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub original_size: u64,
    pub cleaned_size: u64,
    /// `false` cuando el archivo no tenia metadata que quitar.
    pub modified: bool,
}

impl SanitizeOutcome {
    pub fn size_reduction(&self) -> i64 {
        self.original_size as i64 - self.cleaned_size as i64
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.size_reduction() as f64 / self.original_size as f64 * 100.0
    }

    /// Comparacion de tamanos antes y despues de la limpieza.
    pub fn report(&self) -> String {
        let rule = "=".repeat(REPORT_RULE);
        [
            "Sanitization Report".to_string(),
            rule.clone(),
            format!("Original File:  {}", self.input.display()),
            format!(
                "Original Size:  {} bytes ({})",
                self.original_size,
                format_size(self.original_size)
            ),
            format!("Cleaned File:   {}", self.output.display()),
            format!(
                "Cleaned Size:   {} bytes ({})",
                self.cleaned_size,
                format_size(self.cleaned_size)
            ),
            format!(
                "Size Reduction: {} bytes ({:.2}%)",
                self.size_reduction(),
                self.reduction_percent()
            ),
            rule,
        ]
        .join("\n")
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SanitizeError + '_ {
    move |source| SanitizeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Escribe una copia sin metadata de `input`. Sin `output` la copia queda en
/// [`default_output_path`]; si `output` es el propio `input` el original se
/// reemplaza.
pub fn sanitize_file(input: &Path, output: Option<&Path>) -> Result<SanitizeOutcome, SanitizeError> {
    let stats = match fs::metadata(input) {
        Ok(stats) => stats,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(SanitizeError::NotFound(input.to_path_buf()));
        }
        Err(source) => return Err(io_error(input)(source)),
    };
    if !stats.is_file() {
        return Err(SanitizeError::NotAFile(input.to_path_buf()));
    }

    let cleaner =
        Cleaner::for_path(input).ok_or_else(|| SanitizeError::Unsupported(input.to_path_buf()))?;
    let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
    let temp = temp_path(&output);

    let modified = match cleaner.clean(input, &temp) {
        Ok(modified) => modified,
        Err(reason) => {
            let _ = fs::remove_file(&temp);
            return Err(SanitizeError::Clean {
                path: input.to_path_buf(),
                reason,
            });
        }
    };

    match cleaner.verify(&temp) {
        Ok(true) => {}
        Ok(false) => {
            let _ = fs::remove_file(&temp);
            return Err(SanitizeError::Residual(input.to_path_buf()));
        }
        Err(reason) => {
            let _ = fs::remove_file(&temp);
            return Err(SanitizeError::Clean {
                path: input.to_path_buf(),
                reason,
            });
        }
    }

    fs::rename(&temp, &output).map_err(|source| {
        let _ = fs::remove_file(&temp);
        io_error(&output)(source)
    })?;
    let cleaned_size = fs::metadata(&output).map_err(io_error(&output))?.len();

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        modified,
        "metadata eliminada"
    );

    Ok(SanitizeOutcome {
        input: input.to_path_buf(),
        output,
        original_size: stats.len(),
        cleaned_size,
        modified,
    })
}

/// Totales de una limpieza por directorio.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Limpia cada archivo soportado de `dir`. Con `output_dir` las copias
/// conservan su ruta relativa dentro de ese directorio; sin el, cada copia
/// queda junto a su original con el sufijo `_cleaned`. Los archivos sin
/// limpiador se cuentan como omitidos.
pub fn sanitize_directory(
    dir: &Path,
    output_dir: Option<&Path>,
    recursive: bool,
) -> Result<SanitizeSummary, SanitizeError> {
    let stats = fs::metadata(dir).map_err(io_error(dir))?;
    if !stats.is_dir() {
        return Err(SanitizeError::NotADirectory(dir.to_path_buf()));
    }

    let mut walker = WalkDir::new(dir).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => {
                return Err(SanitizeError::Walk {
                    path: dir.to_path_buf(),
                    source: error,
                });
            }
            Err(error) => {
                tracing::warn!(%error, "entrada omitida durante el recorrido");
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let mut summary = SanitizeSummary::default();
    for path in files {
        summary.total += 1;
        if !is_sanitizable(&path) {
            tracing::debug!(path = %path.display(), "archivo sin limpiador, omitido");
            summary.skipped += 1;
            continue;
        }

        let target = match output_dir {
            Some(output_dir) => {
                let relative = path.strip_prefix(dir).unwrap_or(&path);
                let target = output_dir.join(relative);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(io_error(parent))?;
                }
                target
            }
            None => default_output_path(&path),
        };

        match sanitize_file(&path, Some(&target)) {
            Ok(_) => summary.success += 1,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "no se pudo limpiar");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cleaned_copy_keeps_the_extension() {
        assert_eq!(
            default_output_path(Path::new("fotos/IMG_0001.JPG")),
            Path::new("fotos/IMG_0001_cleaned.JPG")
        );
        assert_eq!(
            default_output_path(Path::new("LEEME")),
            Path::new("LEEME_cleaned")
        );
    }

    #[test]
    fn only_known_extensions_have_a_cleaner() {
        assert!(is_sanitizable(Path::new("a.jpeg")));
        assert!(is_sanitizable(Path::new("b.XLSX")));
        assert!(is_sanitizable(Path::new("c.pdf")));
        assert!(!is_sanitizable(Path::new("d.mp3")));
        assert!(!is_sanitizable(Path::new("e.doc")));
    }

    #[test]
    fn unsupported_file_is_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("cancion.mp3");
        fs::write(&path, b"ID3").expect("write");

        assert!(matches!(
            sanitize_file(&path, None),
            Err(SanitizeError::Unsupported(_))
        ));
        assert!(!default_output_path(&path).exists());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().expect("temp dir");
        assert!(matches!(
            sanitize_file(&dir.path().join("nada.png"), None),
            Err(SanitizeError::NotFound(_))
        ));
    }

    #[test]
    fn failed_clean_leaves_no_files_behind() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("roto.jpg");
        fs::write(&path, b"not an image").expect("write");

        assert!(matches!(
            sanitize_file(&path, None),
            Err(SanitizeError::Clean { .. })
        ));
        let remaining: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(remaining, vec![std::ffi::OsString::from("roto.jpg")]);
    }

    #[test]
    fn report_shows_the_size_change() {
        let outcome = SanitizeOutcome {
            input: PathBuf::from("foto.jpg"),
            output: PathBuf::from("foto_cleaned.jpg"),
            original_size: 2000,
            cleaned_size: 1500,
            modified: true,
        };

        assert_eq!(outcome.size_reduction(), 500);
        assert!((outcome.reduction_percent() - 25.0).abs() < f64::EPSILON);
        let report = outcome.report();
        assert!(report.starts_with("Sanitization Report"));
        assert!(report.contains("Size Reduction: 500 bytes (25.00%)"));
    }
}
