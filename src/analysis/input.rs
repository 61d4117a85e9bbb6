//! Modelo tipado de la metadata extraida que consume el motor de analisis.
//!
//! Cada seccion es un [`Section`] de tres estados: ausente, fallida (la
//! extraccion dejo un `error`) o presente. Los campos individuales son
//! tolerantes: un valor con tipo inesperado se trata como ausente.

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Estado de una seccion de la metadata extraida.
#[derive(Clone, Debug, PartialEq)]
pub enum Section<T> {
    Absent,
    Failed(String),
    Present(T),
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Section::Absent
    }
}

impl<T> Section<T> {
    /// Devuelve los datos solo cuando la seccion se extrajo sin errores.
    pub fn data(&self) -> Option<&T> {
        match self {
            Section::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Section::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Section::Absent)
    }
}

impl<T: DeserializeOwned> Section<T> {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Section::Absent;
        };

        if let Some(error) = map.get("error") {
            let message = match error {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return Section::Failed(message);
        }

        match T::deserialize(Value::Object(map)) {
            Ok(data) => Section::Present(data),
            Err(error) => {
                tracing::debug!(%error, "seccion con forma inesperada, se ignora");
                Section::Absent
            }
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Section<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Section::from_value(value))
    }
}

impl<T: Serialize> Serialize for Section<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct ErrorShape<'a> {
            error: &'a str,
        }

        match self {
            Section::Absent => serializer.serialize_none(),
            Section::Failed(message) => ErrorShape { error: message }.serialize(serializer),
            Section::Present(data) => data.serialize(serializer),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Document,
    Video,
    Audio,
    Unknown,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Document => "document",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for FileType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "image" => FileType::Image,
            "document" => FileType::Document,
            "video" => FileType::Video,
            "audio" => FileType::Audio,
            _ => FileType::Unknown,
        })
    }
}

/// Estructura completa producida por la extraccion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataInput {
    #[serde(skip_serializing_if = "Section::is_absent")]
    pub file_info: Section<FileInfo>,
    #[serde(
        deserialize_with = "lenient::file_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_type: Option<FileType>,
    #[serde(
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub mime_type: Option<String>,
    #[serde(
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub extraction_time: Option<String>,
    #[serde(skip_serializing_if = "Section::is_absent")]
    pub image_metadata: Section<ImageProperties>,
    #[serde(skip_serializing_if = "Section::is_absent")]
    pub exif_data: Section<ExifData>,
    #[serde(skip_serializing_if = "Section::is_absent")]
    pub gps_data: Section<GpsData>,
    #[serde(skip_serializing_if = "Section::is_absent")]
    pub document_metadata: Section<DocumentMetadata>,
    #[serde(skip_serializing_if = "Section::is_absent")]
    pub media_metadata: Section<MediaMetadata>,
}

impl MetadataInput {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Interpreta un valor JSON ya decodificado; cualquier forma no objeto
    /// produce una entrada vacia.
    pub fn from_json_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(deserialize_with = "lenient::unsigned", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub accessed: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub md5_hash: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub sha256_hash: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProperties {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(deserialize_with = "lenient::unsigned", skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(deserialize_with = "lenient::unsigned", skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Etiquetas EXIF planas (nombre de etiqueta → valor textual) mas las fechas
/// interpretadas, que se serializan anidadas bajo `parsed_dates`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExifData {
    pub fields: BTreeMap<String, String>,
    pub parsed_dates: BTreeMap<String, String>,
}

pub const PARSED_DATES_KEY: &str = "parsed_dates";

impl Serialize for ExifData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nested = usize::from(!self.parsed_dates.is_empty());
        let mut map = serializer.serialize_map(Some(self.fields.len() + nested))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        if !self.parsed_dates.is_empty() {
            map.serialize_entry(PARSED_DATES_KEY, &self.parsed_dates)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExifData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(mut map) = Value::deserialize(deserializer)? else {
            return Ok(ExifData::default());
        };
        let parsed_dates = match map.remove(PARSED_DATES_KEY) {
            Some(Value::Object(dates)) => lenient::text_map(dates),
            _ => BTreeMap::new(),
        };

        Ok(ExifData {
            fields: lenient::text_map(map),
            parsed_dates,
        })
    }
}

impl ExifData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Busca la clave simple y, si no existe, la variante con prefijo `EXIF `.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key)
            .or_else(|| self.get(&format!("EXIF {key}")))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsData {
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub latitude_decimal: Option<f64>,
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub longitude_decimal: Option<f64>,
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub altitude_meters: Option<f64>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
}

impl GpsData {
    pub fn coordinates_decimal(&self) -> Option<(f64, f64)> {
        Some((self.latitude_decimal?, self.longitude_decimal?))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Descripcion de hojas de calculo; no se trata como comentario.
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient::integer", skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(deserialize_with = "lenient::unsigned", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
}

impl DocumentMetadata {
    /// Campos de organizacion en el orden en que se revisan.
    pub fn organization_fields(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("company", self.company.as_deref()),
            ("organization", self.organization.as_deref()),
            ("category", self.category.as_deref()),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaMetadata {
    #[serde(
        rename = "mutagen_data",
        deserialize_with = "lenient::nested",
        skip_serializing_if = "Option::is_none"
    )]
    pub stream: Option<StreamProperties>,
    #[serde(deserialize_with = "lenient::string_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamProperties {
    #[serde(deserialize_with = "lenient::number")]
    pub length: Option<f64>,
    #[serde(deserialize_with = "lenient::unsigned")]
    pub bitrate: Option<u64>,
    #[serde(deserialize_with = "lenient::unsigned")]
    pub sample_rate: Option<u64>,
    #[serde(deserialize_with = "lenient::unsigned")]
    pub channels: Option<u64>,
}

mod lenient {
    use super::FileType;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};
    use std::collections::BTreeMap;

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_to_text(&Value::deserialize(deserializer)?))
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => raw.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|value| value.is_finite()))
    }

    pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
            Value::String(raw) => raw.trim().parse::<i64>().ok(),
            _ => None,
        })
    }

    pub fn unsigned<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_u64(),
            Value::String(raw) => raw.trim().parse::<u64>().ok(),
            _ => None,
        })
    }

    pub fn file_type<'de, D>(deserializer: D) -> Result<Option<FileType>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => serde_json::from_value(Value::String(raw)).ok(),
            _ => None,
        })
    }

    pub fn nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }

    pub fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(map) = Value::deserialize(deserializer)? else {
            return Ok(BTreeMap::new());
        };
        Ok(text_map(map))
    }

    /// Conserva solo las entradas con valor textual o numerico.
    pub fn text_map(map: Map<String, Value>) -> BTreeMap<String, String> {
        map.into_iter()
            .filter_map(|(key, value)| value_to_text(&value).map(|text| (key, text)))
            .collect()
    }

    fn value_to_text(value: &Value) -> Option<String> {
        match value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().filter_map(value_to_text).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        }
    }
}
