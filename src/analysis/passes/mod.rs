//! Pasadas de clasificacion. Cada una es independiente: lee solo la entrada
//! y anexa sus hallazgos al acumulador comun.

mod device;
mod document;
mod filesystem;
mod gps;
mod hashes;
mod media;
mod timestamps;

pub(crate) use device::check_device_information;
pub(crate) use document::analyze_document_properties;
pub(crate) use filesystem::analyze_file_system;
pub(crate) use gps::analyze_gps_data;
pub(crate) use hashes::generate_hash_indicators;
pub(crate) use media::analyze_media_properties;
pub(crate) use timestamps::analyze_timestamps;
