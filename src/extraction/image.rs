//! Propiedades de imagen, EXIF y coordenadas GPS.

use crate::analysis::input::{ExifData, GpsData, ImageProperties, Section};
use crate::formatting::format_decimal;
use exif::{Exif, Field, In, Tag, Value};
use image::{ColorType, ImageDecoder, ImageReader};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub(super) struct ImageSections {
    pub properties: Section<ImageProperties>,
    pub exif: Section<ExifData>,
    pub gps: Section<GpsData>,
}

pub(super) fn extract(path: &Path) -> ImageSections {
    let properties = match read_properties(path) {
        Ok(properties) => Section::Present(properties),
        Err(error) => Section::Failed(error.to_string()),
    };

    let (exif, gps) = match read_exif(path) {
        Ok(Some(exif)) => (
            Section::Present(exif_fields(&exif)),
            gps_from_exif(&exif).map_or(Section::Absent, Section::Present),
        ),
        Ok(None) => (Section::Present(ExifData::default()), Section::Absent),
        Err(error) => {
            let message = error.to_string();
            (Section::Failed(message.clone()), Section::Failed(message))
        }
    };

    ImageSections {
        properties,
        exif,
        gps,
    }
}

fn read_properties(path: &Path) -> image::ImageResult<ImageProperties> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .map(|format| format!("{format:?}").to_uppercase());
    let decoder = reader.into_decoder()?;
    let (width, height) = decoder.dimensions();

    Ok(ImageProperties {
        format,
        width: Some(u64::from(width)),
        height: Some(u64::from(height)),
        mode: Some(color_mode(decoder.color_type()).to_string()),
    })
}

/// Nombre corto del modo de color.
fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        _ => "unknown",
    }
}

/// Lee el bloque EXIF; `None` cuando la imagen no tiene EXIF.
fn read_exif(path: &Path) -> Result<Option<Exif>, exif::Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::NotFound(_)) => Ok(None),
        Err(error) => Err(error),
    }
}

fn exif_fields(exif: &Exif) -> ExifData {
    let fields: BTreeMap<String, String> = exif
        .fields()
        .filter(|field| field.ifd_num == In::PRIMARY && field.tag != Tag::MakerNote)
        .filter_map(|field| {
            let value = field_text(exif, field);
            (!value.is_empty()).then(|| (field.tag.to_string(), value))
        })
        .collect();

    let parsed_dates = parse_exif_dates(&fields);
    ExifData {
        fields,
        parsed_dates,
    }
}

/// Etiquetas de fecha EXIF y la descripcion con la que se reportan.
const DATE_LABELS: [(&str, &str); 6] = [
    ("DateTime", "File Change Date"),
    ("DateTimeOriginal", "Original Date (when photo was taken)"),
    ("DateTimeDigitized", "Digitized Date (when photo was saved)"),
    ("EXIF DateTimeOriginal", "Original Date (when photo was taken)"),
    ("EXIF DateTimeDigitized", "Digitized Date (when photo was saved)"),
    ("Image DateTime", "Image Date"),
];

/// `2024:03:15 10:15:00` pasa a `2024-03-15 10:15:00`.
fn parse_exif_dates(fields: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    DATE_LABELS
        .iter()
        .filter_map(|(tag, label)| {
            let raw = fields.get(*tag)?;
            Some((label.to_string(), raw.replacen(':', "-", 2)))
        })
        .collect()
}

fn field_text(exif: &Exif, field: &Field) -> String {
    match &field.value {
        Value::Ascii(chunks) => chunks
            .iter()
            .map(|chunk| String::from_utf8_lossy(chunk).trim_end_matches('\0').trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => field.display_value().with_unit(exif).to_string(),
    }
}

fn gps_from_exif(exif: &Exif) -> Option<GpsData> {
    let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S');
    let longitude = coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W');
    let altitude = altitude(exif);

    if latitude.is_none() && longitude.is_none() && altitude.is_none() {
        return None;
    }

    let coordinates = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(format!("{}, {}", format_decimal(lat), format_decimal(lon))),
        _ => None,
    };

    Some(GpsData {
        latitude_decimal: latitude.zip(longitude).map(|(lat, _)| lat),
        longitude_decimal: latitude.zip(longitude).map(|(_, lon)| lon),
        altitude_meters: altitude,
        coordinates,
    })
}

/// Grados decimales a partir de grados, minutos y segundos racionales.
fn coordinate(exif: &Exif, tag: Tag, reference: Tag, negative: u8) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Rational(parts) = &field.value else {
        return None;
    };
    let [degrees, minutes, seconds] = parts.as_slice() else {
        return None;
    };
    let value = degrees.to_f64() + minutes.to_f64() / 60.0 + seconds.to_f64() / 3600.0;
    if !value.is_finite() {
        return None;
    }

    let is_negative = exif
        .get_field(reference, In::PRIMARY)
        .is_some_and(|field| match &field.value {
            Value::Ascii(chunks) => chunks
                .first()
                .and_then(|chunk| chunk.first())
                .is_some_and(|letter| letter.eq_ignore_ascii_case(&negative)),
            _ => false,
        });

    Some(if is_negative { -value } else { value })
}

fn altitude(exif: &Exif) -> Option<f64> {
    let field = exif.get_field(Tag::GPSAltitude, In::PRIMARY)?;
    let value = match &field.value {
        Value::Rational(parts) => parts.first()?.to_f64(),
        _ => return None,
    };
    if !value.is_finite() {
        return None;
    }

    let below_sea_level = exif
        .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
        .is_some_and(|field| matches!(&field.value, Value::Byte(bytes) if bytes.first() == Some(&1)));

    Some(if below_sea_level { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn png_without_exif_has_empty_exif_and_no_gps() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("plain.png");
        RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]))
            .save(&path)
            .expect("save png");

        let sections = extract(&path);

        let properties = sections.properties.data().expect("properties");
        assert_eq!(properties.format.as_deref(), Some("PNG"));
        assert_eq!(properties.width, Some(4));
        assert_eq!(properties.height, Some(3));
        assert_eq!(properties.mode.as_deref(), Some("RGB"));
        assert!(sections.exif.data().is_some_and(ExifData::is_empty));
        assert!(sections.gps.is_absent());
    }

    #[test]
    fn exif_dates_get_readable_labels() {
        let fields: BTreeMap<String, String> = [
            ("DateTime", "2024:03:15 10:15:00"),
            ("DateTimeOriginal", "2023:12:01 08:00:05"),
            ("Make", "Canon"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let dates = parse_exif_dates(&fields);

        assert_eq!(dates.len(), 2);
        assert_eq!(
            dates.get("File Change Date").map(String::as_str),
            Some("2024-03-15 10:15:00")
        );
        assert_eq!(
            dates
                .get("Original Date (when photo was taken)")
                .map(String::as_str),
            Some("2023-12-01 08:00:05")
        );
    }

    #[test]
    fn corrupt_image_fails_sections() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").expect("write");

        let sections = extract(&path);

        assert!(sections.properties.error().is_some());
    }
}
