//! Limpieza de paquetes OOXML (docx, xlsx, pptx). Se reescribe el zip parte
//! por parte y solo cambian las propiedades del paquete.

use crate::extraction::document::{APP_NS, CP_NS, DC_NS, DCTERMS_NS};
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use xmltree::{Element, EmitterConfig, XMLNode};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

const CORE_PART: &str = "docProps/core.xml";
const APP_PART: &str = "docProps/app.xml";
const CUSTOM_PART: &str = "docProps/custom.xml";

/// Propiedad a normalizar: espacio de nombres, nombre local y valor final.
type Field = (&'static str, &'static str, &'static str);

const CORE_FIELDS: [Field; 11] = [
    (DC_NS, "creator", ""),
    (CP_NS, "lastModifiedBy", ""),
    (DCTERMS_NS, "created", ""),
    (DCTERMS_NS, "modified", ""),
    (DC_NS, "title", ""),
    (DC_NS, "subject", ""),
    (DC_NS, "description", ""),
    (CP_NS, "keywords", ""),
    (CP_NS, "category", ""),
    (CP_NS, "contentStatus", ""),
    (CP_NS, "revision", "1"),
];

const APP_FIELDS: [Field; 6] = [
    (APP_NS, "Application", ""),
    (APP_NS, "Company", ""),
    (APP_NS, "Manager", ""),
    (APP_NS, "Pages", "0"),
    (APP_NS, "Words", "0"),
    (APP_NS, "Lines", "0"),
];

const CUSTOM_PROPERTIES_EMPTY: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/custom-properties\" xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\"/>\n";

pub(super) fn clean(input: &Path, output: &Path) -> Result<bool, String> {
    rewrite_package(input, output, |name, contents| match name {
        CORE_PART => scrub_part(contents, &CORE_FIELDS).map_err(|error| format!("core.xml: {error}")),
        APP_PART => scrub_part(contents, &APP_FIELDS).map_err(|error| format!("app.xml: {error}")),
        CUSTOM_PART => {
            let empty = CUSTOM_PROPERTIES_EMPTY.as_bytes().to_vec();
            let modified = contents != empty;
            Ok((empty, modified))
        }
        _ => Ok((contents, false)),
    })
}

/// Copia cada entrada del zip aplicando `transform` a su contenido.
fn rewrite_package<F>(input: &Path, output: &Path, mut transform: F) -> Result<bool, String>
where
    F: FnMut(&str, Vec<u8>) -> Result<(Vec<u8>, bool), String>,
{
    let source = File::open(input).map_err(|error| format!("no se pudo abrir el archivo: {error}"))?;
    let mut archive =
        ZipArchive::new(source).map_err(|error| format!("no es un documento Office valido: {error}"))?;

    let target =
        File::create(output).map_err(|error| format!("no se pudo crear el archivo limpio: {error}"))?;
    let mut writer = ZipWriter::new(target);
    let mut modified_any = false;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|error| format!("error leyendo el zip: {error}"))?;
        let name = entry.name().to_string();

        let mut options = FileOptions::<'_, ()>::default().compression_method(entry.compression());
        if let Some(mode) = entry.unix_mode() {
            options = options.unix_permissions(mode);
        }
        if let Some(time) = entry.last_modified() {
            options = options.last_modified_time(time);
        }

        if entry.is_dir() {
            writer
                .add_directory(name, options)
                .map_err(|error| format!("error creando directorio en el zip: {error}"))?;
            continue;
        }

        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .map_err(|error| format!("error leyendo `{name}`: {error}"))?;

        let (contents, changed) = transform(&name, contents)?;
        modified_any |= changed;

        writer
            .start_file(name.as_str(), options)
            .map_err(|error| format!("error escribiendo `{name}`: {error}"))?;
        writer
            .write_all(&contents)
            .map_err(|error| format!("error escribiendo `{name}`: {error}"))?;
    }

    writer
        .finish()
        .map_err(|error| format!("error finalizando el zip: {error}"))?;
    Ok(modified_any)
}

fn field_for(element: &Element, fields: &[Field]) -> Option<&'static str> {
    fields.iter().find_map(|(namespace, name, value)| {
        (element.name == *name && element.namespace.as_deref() == Some(*namespace)).then_some(*value)
    })
}

fn element_text(element: &Element) -> String {
    element
        .get_text()
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

fn scrub_part(contents: Vec<u8>, fields: &[Field]) -> Result<(Vec<u8>, bool), String> {
    let mut root = Element::parse(Cursor::new(&contents[..]))
        .map_err(|error| format!("XML de propiedades invalido: {error}"))?;

    let mut modified = false;
    for node in &mut root.children {
        let XMLNode::Element(child) = node else {
            continue;
        };
        let Some(value) = field_for(child, fields) else {
            continue;
        };
        if element_text(child) != value {
            child.children = if value.is_empty() {
                Vec::new()
            } else {
                vec![XMLNode::Text(value.to_string())]
            };
            modified = true;
        }
    }

    if !modified {
        return Ok((contents, false));
    }

    let mut output = Vec::new();
    let mut config = EmitterConfig::new();
    config.perform_indent = false;
    config.write_document_declaration = true;
    root.write_with_config(&mut output, config)
        .map_err(|error| format!("no se pudo escribir el XML limpio: {error}"))?;

    Ok((output, true))
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<Element>, String> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(error) => return Err(format!("error leyendo `{name}`: {error}")),
    };
    let mut contents = Vec::new();
    part.read_to_end(&mut contents)
        .map_err(|error| format!("error leyendo `{name}`: {error}"))?;
    Element::parse(Cursor::new(contents))
        .map(Some)
        .map_err(|error| format!("`{name}` no es XML valido: {error}"))
}

fn part_is_clean(root: &Element, fields: &[Field]) -> bool {
    root.children.iter().all(|node| match node {
        XMLNode::Element(child) => {
            field_for(child, fields).is_none_or(|value| element_text(child) == value)
        }
        _ => true,
    })
}

/// Relee el paquete limpio y confirma que las propiedades quedaron normalizadas.
pub(super) fn verify(path: &Path) -> Result<bool, String> {
    let file = File::open(path).map_err(|error| format!("no se pudo abrir el archivo limpio: {error}"))?;
    let mut archive =
        ZipArchive::new(file).map_err(|error| format!("no es un documento Office valido: {error}"))?;

    if let Some(core) = read_part(&mut archive, CORE_PART)?
        && !part_is_clean(&core, &CORE_FIELDS)
    {
        return Ok(false);
    }
    if let Some(app) = read_part(&mut archive, APP_PART)?
        && !part_is_clean(&app, &APP_FIELDS)
    {
        return Ok(false);
    }
    if let Some(custom) = read_part(&mut archive, CUSTOM_PART)?
        && custom
            .children
            .iter()
            .any(|node| matches!(node, XMLNode::Element(_)))
    {
        return Ok(false);
    }

    Ok(true)
}
