//! Limpieza de PDF: se quitan el diccionario `Info` del trailer y el flujo
//! XMP (`Metadata`) del catalogo.

use lopdf::{Document, Object};
use std::path::Path;

pub(super) fn clean(input: &Path, output: &Path) -> Result<bool, String> {
    let mut doc =
        Document::load(input).map_err(|error| format!("no se pudo leer el PDF: {error}"))?;

    let mut modified = doc.trailer.remove(b"Info").is_some();
    if let Ok(root_id) = doc.trailer.get(b"Root").and_then(Object::as_reference)
        && let Ok(catalog) = doc.get_object_mut(root_id).and_then(Object::as_dict_mut)
    {
        modified |= catalog.remove(b"Metadata").is_some();
    }

    doc.prune_objects();
    doc.save(output)
        .map_err(|error| format!("no se pudo guardar el PDF limpio: {error}"))?;
    Ok(modified)
}

pub(super) fn verify(path: &Path) -> Result<bool, String> {
    let doc = Document::load(path).map_err(|error| format!("no se pudo leer el PDF limpio: {error}"))?;
    if doc.trailer.has(b"Info") {
        return Ok(false);
    }

    let catalog_has_xmp = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|root_id| doc.get_dictionary(root_id))
        .is_ok_and(|catalog| catalog.has(b"Metadata"));
    Ok(!catalog_has_xmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};
    use tempfile::tempdir;

    fn write_pdf_with_info(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"BT ET".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let xmp_id = doc.add_object(Stream::new(
            dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
            b"<x:xmpmeta/>".to_vec(),
        ));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "Metadata" => xmp_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Author" => Object::string_literal("Jane Doe"),
            "Producer" => Object::string_literal("Acme PDF"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.save(path).expect("save pdf");
    }

    #[test]
    fn info_and_xmp_are_removed() {
        let dir = tempdir().expect("temp dir");
        let input = dir.path().join("informe.pdf");
        let output = dir.path().join("informe_cleaned.pdf");
        write_pdf_with_info(&input);
        assert!(!verify(&input).expect("verify original"));

        assert!(clean(&input, &output).expect("clean"));
        assert!(verify(&output).expect("verify"));

        let cleaned = Document::load(&output).expect("load cleaned");
        assert_eq!(cleaned.get_pages().len(), 1);
    }

    #[test]
    fn pdf_without_metadata_is_not_modified() {
        let dir = tempdir().expect("temp dir");
        let input = dir.path().join("informe.pdf");
        let once = dir.path().join("una.pdf");
        let twice = dir.path().join("dos.pdf");
        write_pdf_with_info(&input);

        clean(&input, &once).expect("first clean");
        assert!(!clean(&once, &twice).expect("second clean"));
    }
}
