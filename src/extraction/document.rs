//! Propiedades de documentos PDF y Office (OOXML).

use crate::analysis::input::{DocumentMetadata, Section};
use chrono::NaiveDateTime;
use lopdf::{Dictionary, Document, Object};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xmltree::{Element, XMLNode};

pub(crate) const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub(crate) const CP_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
pub(crate) const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
pub(crate) const APP_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

const UNSUPPORTED: &str = "Unsupported document type";

pub(super) fn extract(path: &Path) -> Section<DocumentMetadata> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let result = match extension.as_str() {
        "pdf" => read_pdf(path),
        "docx" | "pptx" => read_ooxml(path, AuthorField::Author),
        "xlsx" => read_ooxml(path, AuthorField::Creator),
        _ => Err(UNSUPPORTED.to_string()),
    };

    match result {
        Ok(metadata) => Section::Present(metadata),
        Err(message) => Section::Failed(message),
    }
}

fn read_pdf(path: &Path) -> Result<DocumentMetadata, String> {
    let doc = Document::load(path).map_err(|error| error.to_string())?;

    let mut metadata = DocumentMetadata {
        page_count: Some(doc.get_pages().len() as u64),
        ..DocumentMetadata::default()
    };

    let Some(info) = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|info| deref_dictionary(&doc, info))
    else {
        return Ok(metadata);
    };

    let text = |key: &[u8]| {
        info.get(key)
            .ok()
            .and_then(|object| object_to_string(&doc, object))
            .filter(|value| !value.is_empty())
    };

    metadata.title = text(b"Title");
    metadata.author = text(b"Author");
    metadata.subject = text(b"Subject");
    metadata.keywords = text(b"Keywords");
    metadata.creator = text(b"Creator");
    metadata.producer = text(b"Producer");
    metadata.created = text(b"CreationDate").map(|raw| pdf_date(&raw));
    metadata.modified = text(b"ModDate").map(|raw| pdf_date(&raw));

    Ok(metadata)
}

fn deref_dictionary<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(reference) => doc.get_dictionary(*reference).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn object_to_string(doc: &Document, obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_text(bytes).trim().to_string()),
        Object::Name(name) => Some(String::from_utf8_lossy(name).trim().to_string()),
        Object::Reference(reference) => doc
            .get_object(*reference)
            .ok()
            .and_then(|inner| object_to_string(doc, inner)),
        _ => None,
    }
}

/// Cadenas de texto PDF: UTF-16BE con BOM o bytes de un solo octeto.
fn decode_pdf_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Convierte `D:YYYYMMDDHHmmSS...` a ISO-8601; si no encaja se conserva el
/// valor original.
fn pdf_date(raw: &str) -> String {
    let digits = raw.trim_start_matches("D:");
    digits
        .get(..14)
        .and_then(|stamp| NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").ok())
        .map(|datetime| datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AuthorField {
    Author,
    Creator,
}

fn read_ooxml(path: &Path, author_field: AuthorField) -> Result<DocumentMetadata, String> {
    let file = File::open(path).map_err(|error| error.to_string())?;
    let mut archive = zip::ZipArchive::new(file).map_err(|error| error.to_string())?;

    let mut metadata = DocumentMetadata::default();

    if let Some(core) = read_part(&mut archive, "docProps/core.xml") {
        let creator = child_text(&core, "creator", DC_NS);
        let description = child_text(&core, "description", DC_NS);
        match author_field {
            AuthorField::Author => {
                metadata.author = creator;
                metadata.comments = description;
            }
            AuthorField::Creator => {
                metadata.creator = creator;
                metadata.description = description;
            }
        }
        metadata.title = child_text(&core, "title", DC_NS);
        metadata.subject = child_text(&core, "subject", DC_NS);
        metadata.keywords = child_text(&core, "keywords", CP_NS);
        metadata.category = child_text(&core, "category", CP_NS);
        metadata.last_modified_by = child_text(&core, "lastModifiedBy", CP_NS);
        metadata.revision =
            child_text(&core, "revision", CP_NS).and_then(|value| value.parse().ok());
        metadata.created = child_text(&core, "created", DCTERMS_NS);
        metadata.modified = child_text(&core, "modified", DCTERMS_NS);
    }

    if let Some(app) = read_part(&mut archive, "docProps/app.xml") {
        metadata.company = child_text(&app, "Company", APP_NS);
        metadata.producer = child_text(&app, "Application", APP_NS);
        metadata.page_count = child_text(&app, "Pages", APP_NS)
            .or_else(|| child_text(&app, "Slides", APP_NS))
            .and_then(|value| value.parse().ok());
    }

    Ok(metadata)
}

fn read_part(archive: &mut zip::ZipArchive<File>, name: &str) -> Option<Element> {
    let mut part = archive.by_name(name).ok()?;
    let mut contents = String::new();
    part.read_to_string(&mut contents).ok()?;
    Element::parse(contents.as_bytes()).ok()
}

/// Texto del primer hijo con ese nombre y espacio de nombres; vacio cuenta
/// como ausente.
fn child_text(root: &Element, local_name: &str, namespace: &str) -> Option<String> {
    root.children.iter().find_map(|node| match node {
        XMLNode::Element(child)
            if child.name == local_name && child.namespace.as_deref() == Some(namespace) =>
        {
            let text: String = child
                .children
                .iter()
                .filter_map(|node| match node {
                    XMLNode::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    })
}
