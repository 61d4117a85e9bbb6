//! Propiedades de flujo y etiquetas de audio y video.

use crate::analysis::input::{MediaMetadata, Section, StreamProperties};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::{FormatOptions, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::Hint;
use symphonia::default::get_probe;

pub(super) fn extract(path: &Path) -> Section<MediaMetadata> {
    match read_container(path) {
        Ok(metadata) => Section::Present(metadata),
        Err(error) => Section::Failed(error.to_string()),
    }
}

fn read_container(path: &Path) -> Result<MediaMetadata, symphonia::core::errors::Error> {
    let source = File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let mut opened = get_probe().format(
        &hint,
        stream,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut tags = BTreeMap::new();
    if let Some(revision) = opened.metadata.get().as_ref().and_then(|meta| meta.current()) {
        collect_tags(revision, &mut tags);
    }
    if let Some(revision) = opened.format.metadata().current() {
        collect_tags(revision, &mut tags);
    }

    let stream = opened
        .format
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .map(stream_properties);

    Ok(MediaMetadata { stream, tags })
}

fn stream_properties(track: &Track) -> StreamProperties {
    let params = &track.codec_params;
    let length = params
        .time_base
        .zip(params.n_frames)
        .map(|(time_base, frames)| {
            let time = time_base.calc_time(frames);
            time.seconds as f64 + time.frac
        });

    StreamProperties {
        length,
        bitrate: None,
        sample_rate: params.sample_rate.map(u64::from),
        channels: params.channels.map(|channels| channels.count() as u64),
    }
}

/// Copia las etiquetas: las estandar bajo su nombre comun y el resto con la
/// clave original del contenedor.
fn collect_tags(revision: &MetadataRevision, tags: &mut BTreeMap<String, String>) {
    for tag in revision.tags() {
        let value = tag.value.to_string();
        if value.trim().is_empty() {
            continue;
        }

        let key = match tag.std_key {
            Some(StandardTagKey::Artist) => "artist".to_string(),
            Some(StandardTagKey::Album) => "album".to_string(),
            Some(StandardTagKey::TrackTitle) => "title".to_string(),
            Some(StandardTagKey::Comment) => "comment".to_string(),
            _ => tag.key.clone(),
        };
        tags.entry(key).or_insert(value);
    }
}
