use chrono::NaiveDate;
use filelens_forensics::report::{self, ExportFormat, Report};
use filelens_forensics::{MetadataAnalyzer, MetadataInput};
use serde_json::{Value, json};
use tempfile::tempdir;

fn sample_report() -> Report {
    let metadata = MetadataInput::from_json_value(json!({
        "file_type": "image",
        "mime_type": "image/jpeg",
        "file_info": {
            "filename": "IMG_0001.jpg",
            "full_path": "/fotos/IMG_0001.jpg",
            "size_bytes": 52311,
            "size_human": "51.08 KB",
            "created": "2024-01-01T00:00:00",
            "modified": "2023-01-01T00:00:00",
            "accessed": "2024-06-01T00:00:00",
        },
        "exif_data": {"Make": "Canon", "Model": "EOS R5"},
        "gps_data": {"latitude_decimal": 40.0, "longitude_decimal": -73.0},
    }));
    let reference = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("fecha valida");
    let analysis = MetadataAnalyzer::new(&metadata)
        .with_reference_time(reference)
        .analyze();
    Report::new(metadata, Some(analysis))
}

#[test]
fn json_report_has_info_metadata_and_analysis() -> Result<(), Box<dyn std::error::Error>> {
    let rendered = report::render(&sample_report(), ExportFormat::Json)?;
    let value: Value = serde_json::from_str(&rendered)?;

    assert_eq!(value["report_info"]["report_type"], "File Metadata Analysis");
    assert_eq!(value["metadata"]["file_info"]["filename"], "IMG_0001.jpg");
    assert_eq!(value["analysis"]["risk_level"], "CRITICAL");
    assert_eq!(value["analysis"]["privacy_concerns"][0]["type"], "GPS_LOCATION");
    assert_eq!(value["analysis"]["anomalies"][0]["type"], "TIMESTAMP_ANOMALY");
    Ok(())
}

#[test]
fn json_report_without_analysis_omits_the_key() -> Result<(), Box<dyn std::error::Error>> {
    let report = Report::new(MetadataInput::default(), None);
    let value: Value = serde_json::from_str(&report::render(&report, ExportFormat::Json)?)?;

    assert!(value.get("analysis").is_none());
    Ok(())
}

#[test]
fn text_report_lists_sections_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let text = report::render(&sample_report(), ExportFormat::Txt)?;

    let order = [
        "FILE METADATA ANALYSIS REPORT",
        "FILE INFORMATION",
        "GPS LOCATION DATA",
        "FORENSIC ANALYSIS",
        "ANOMALIES DETECTED",
        "PRIVACY CONCERNS",
        "RECOMMENDATIONS",
        "END OF REPORT",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|heading| text.find(heading).ok_or(*heading))
        .collect::<Result<_, _>>()?;
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(text.contains("Remove GPS coordinates before sharing photos online"));
    Ok(())
}

#[test]
fn summary_is_short() -> Result<(), Box<dyn std::error::Error>> {
    let summary = report::render(&sample_report(), ExportFormat::Summary)?;

    assert!(summary.contains("IMG_0001.jpg"));
    assert!(summary.contains("CRITICAL"));
    assert!(!summary.contains("END OF REPORT"));
    Ok(())
}

#[test]
fn csv_report_is_one_header_and_one_row() -> Result<(), Box<dyn std::error::Error>> {
    let csv = report::render(&sample_report(), ExportFormat::Csv)?;
    let mut reader = csv::Reader::from_reader(csv.as_bytes());

    let headers = reader.headers()?.clone();
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 1);

    let column = |name: &str| headers.iter().position(|header| header == name);
    let risk = column("analysis_risk_level").ok_or("risk column")?;
    assert_eq!(&rows[0][risk], "CRITICAL");
    let lat = column("gps_data_latitude_decimal").ok_or("latitude column")?;
    assert_eq!(&rows[0][lat], "40.0");
    Ok(())
}

#[test]
fn xlsx_is_only_written_to_disk() -> Result<(), Box<dyn std::error::Error>> {
    let report = sample_report();
    assert!(report::render(&report, ExportFormat::Xlsx).is_err());

    let dir = tempdir()?;
    let path = dir.path().join("reporte.xlsx");
    report::export_report(&report, ExportFormat::Xlsx, &path)?;
    assert!(std::fs::metadata(&path)?.len() > 0);
    Ok(())
}
