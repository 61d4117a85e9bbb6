//! Errores de las capas que rodean al motor (extraccion, reportes y limpieza).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("el archivo `{}` no existe", .0.display())]
    NotFound(PathBuf),

    #[error("`{}` no es un archivo regular", .0.display())]
    NotAFile(PathBuf),

    #[error("`{}` no es un directorio", .0.display())]
    NotADirectory(PathBuf),

    #[error("no se pudo leer `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no se pudo recorrer `{}`: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("el formato {0} es binario y requiere una ruta de salida")]
    BinaryFormat(&'static str),

    #[error("no se pudo serializar el reporte: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no se pudo generar el CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no se pudo generar el XLSX: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("no se pudo generar el KML: {0}")]
    Kml(String),

    #[error("no se pudo escribir `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("el archivo `{}` no existe", .0.display())]
    NotFound(PathBuf),

    #[error("`{}` no es un archivo regular", .0.display())]
    NotAFile(PathBuf),

    #[error("`{}` no es un directorio", .0.display())]
    NotADirectory(PathBuf),

    #[error("la limpieza de metadata no esta soportada para `{}`", .0.display())]
    Unsupported(PathBuf),

    #[error("no se pudo limpiar `{}`: {reason}", path.display())]
    Clean { path: PathBuf, reason: String },

    #[error("la verificacion encontro metadata residual en `{}`", .0.display())]
    Residual(PathBuf),

    #[error("error de E/S en `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no se pudo recorrer `{}`: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
