//! Reescritura de imagenes sin EXIF: se decodifican los pixeles y se
//! codifican de nuevo en el mismo formato.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const JPEG_QUALITY: u8 = 95;

pub(super) fn clean(input: &Path, output: &Path) -> Result<bool, String> {
    let reader = ImageReader::open(input)
        .map_err(|error| format!("no se pudo abrir la imagen: {error}"))?
        .with_guessed_format()
        .map_err(|error| format!("no se pudo leer la imagen: {error}"))?;
    let format = reader
        .format()
        .ok_or_else(|| "formato de imagen desconocido".to_string())?;
    let img = reader
        .decode()
        .map_err(|error| format!("no se pudo decodificar la imagen: {error}"))?;

    let file = File::create(output)
        .map_err(|error| format!("no se pudo crear la imagen limpia: {error}"))?;
    let mut writer = BufWriter::new(file);

    let written = if format == ImageFormat::Jpeg {
        img.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))
    } else {
        img.write_to(&mut writer, format)
    };
    written.map_err(|error| format!("no se pudo guardar la imagen limpia: {error}"))?;
    writer
        .flush()
        .map_err(|error| format!("no se pudo guardar la imagen limpia: {error}"))?;

    Ok(true)
}

/// Una imagen limpia no tiene bloque EXIF o lo tiene vacio.
pub(super) fn verify(path: &Path) -> Result<bool, String> {
    let file = File::open(path)
        .map_err(|error| format!("no se pudo abrir la imagen limpia: {error}"))?;
    let mut reader = BufReader::new(file);

    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(exif.fields().next().is_none()),
        Err(exif::Error::NotFound(_) | exif::Error::BlankValue(_) | exif::Error::InvalidFormat(_)) => {
            Ok(true)
        }
        Err(error) => Err(format!("no se pudo verificar el EXIF: {error}")),
    }
}
