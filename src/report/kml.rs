//! Exportacion KML de las coordenadas GPS encontradas en los reportes.

use super::Report;
use crate::error::ReportError;
use crate::formatting::format_decimal;
use std::fs;
use std::path::Path;
use xmltree::{Element, EmitterConfig, Namespace, XMLNode};

const KML_NS: &str = "http://www.opengis.net/kml/2.2";
const DOCUMENT_NAME: &str = "File Metadata GPS Data";
const PLACEMARK_DESCRIPTION: &str = "GPS coordinates extracted from file metadata";

fn text_element(name: &str, text: impl Into<String>) -> Element {
    let mut element = Element::new(name);
    element.children.push(XMLNode::Text(text.into()));
    element
}

fn placemark(name: String, longitude: f64, latitude: f64, altitude: f64) -> Element {
    let coordinates = format!(
        "{},{},{}",
        format_decimal(longitude),
        format_decimal(latitude),
        format_decimal(altitude)
    );

    let mut point = Element::new("Point");
    point
        .children
        .push(XMLNode::Element(text_element("coordinates", coordinates)));

    let mut placemark = Element::new("Placemark");
    placemark.children.extend([
        XMLNode::Element(text_element("name", name)),
        XMLNode::Element(text_element("description", PLACEMARK_DESCRIPTION)),
        XMLNode::Element(point),
    ]);
    placemark
}

/// Arma el documento KML y devuelve cuantas ubicaciones contiene.
fn build_kml(reports: &[Report]) -> (Element, usize) {
    let mut document = Element::new("Document");
    document
        .children
        .push(XMLNode::Element(text_element("name", DOCUMENT_NAME)));

    let mut count = 0;
    for (index, report) in reports.iter().enumerate() {
        let Some(gps) = report.metadata.gps_data.data() else {
            continue;
        };
        let Some((latitude, longitude)) = gps.coordinates_decimal() else {
            continue;
        };
        let name = report
            .filename()
            .map_or_else(|| format!("Location {}", index + 1), str::to_string);
        let altitude = gps.altitude_meters.unwrap_or(0.0);
        document
            .children
            .push(XMLNode::Element(placemark(name, longitude, latitude, altitude)));
        count += 1;
    }

    let mut namespaces = Namespace::empty();
    namespaces.put("", KML_NS);
    let mut root = Element::new("kml");
    root.namespace = Some(KML_NS.to_string());
    root.namespaces = Some(namespaces);
    root.children.push(XMLNode::Element(document));

    (root, count)
}

/// Escribe un KML con una marca por cada reporte con coordenadas. Si ninguno
/// tiene coordenadas no se crea el archivo y se devuelve `0`.
pub fn export_kml(reports: &[Report], path: &Path) -> Result<usize, ReportError> {
    let (root, count) = build_kml(reports);
    if count == 0 {
        tracing::debug!(path = %path.display(), "sin coordenadas GPS para exportar");
        return Ok(0);
    }

    let mut output = Vec::new();
    let mut config = EmitterConfig::new();
    config.perform_indent = true;
    config.write_document_declaration = true;
    root.write_with_config(&mut output, config)
        .map_err(|error| ReportError::Kml(error.to_string()))?;

    fs::write(path, output).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), placemarks = count, "KML exportado");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::input::MetadataInput;
    use serde_json::json;
    use std::io::Cursor;

    fn report(value: serde_json::Value) -> Report {
        Report::new(MetadataInput::from_json_value(value), None)
    }

    fn child<'a>(element: &'a Element, name: &str) -> &'a Element {
        element.get_child(name).expect("elemento hijo")
    }

    #[test]
    fn placemarks_use_lon_lat_alt_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("gps.kml");
        let reports = [
            report(json!({
                "file_info": {"filename": "IMG_0001.jpg"},
                "gps_data": {"latitude_decimal": 40.0, "longitude_decimal": -73.0},
            })),
            report(json!({"file_info": {"filename": "notes.txt"}})),
            report(json!({
                "gps_data": {"latitude_decimal": 1.5, "longitude_decimal": 2.5, "altitude_meters": 12.0},
            })),
        ];

        assert_eq!(export_kml(&reports, &path).expect("kml"), 2);

        let contents = fs::read(&path).expect("read kml");
        let root = Element::parse(Cursor::new(contents)).expect("parse kml");
        assert_eq!(root.name, "kml");
        assert_eq!(root.namespace.as_deref(), Some(KML_NS));

        let document = child(&root, "Document");
        assert_eq!(
            child(document, "name").get_text().as_deref(),
            Some(DOCUMENT_NAME)
        );
        let placemarks: Vec<&Element> = document
            .children
            .iter()
            .filter_map(|node| match node {
                XMLNode::Element(element) if element.name == "Placemark" => Some(element),
                _ => None,
            })
            .collect();
        assert_eq!(placemarks.len(), 2);

        assert_eq!(
            child(placemarks[0], "name").get_text().as_deref(),
            Some("IMG_0001.jpg")
        );
        assert_eq!(
            child(child(placemarks[0], "Point"), "coordinates")
                .get_text()
                .as_deref(),
            Some("-73.0,40.0,0.0")
        );
        assert_eq!(
            child(placemarks[1], "name").get_text().as_deref(),
            Some("Location 3")
        );
        assert_eq!(
            child(child(placemarks[1], "Point"), "coordinates")
                .get_text()
                .as_deref(),
            Some("2.5,1.5,12.0")
        );
    }

    #[test]
    fn nothing_is_written_without_coordinates() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("vacio.kml");
        let reports = [report(json!({"gps_data": {"latitude_decimal": 40.0}}))];

        assert_eq!(export_kml(&reports, &path).expect("kml"), 0);
        assert!(!path.exists());
    }
}
