//! Busqueda de archivos soportados y totales de un analisis por lotes.

use crate::analysis::{AnalysisResult, RiskLevel};
use crate::error::ExtractError;
use crate::extraction::is_supported;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Archivos con extension soportada, ordenados por ruta.
pub fn find_supported_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ExtractError> {
    let stats = fs::metadata(dir).map_err(|source| ExtractError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if !stats.is_dir() {
        return Err(ExtractError::NotADirectory(dir.to_path_buf()));
    }

    let mut walker = WalkDir::new(dir).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => {
                return Err(ExtractError::Walk {
                    path: dir.to_path_buf(),
                    source: error,
                });
            }
            Err(error) => {
                tracing::warn!(%error, "entrada omitida durante el recorrido");
                continue;
            }
        };
        if entry.file_type().is_file() && is_supported(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(dir = %dir.display(), count = files.len(), "archivos soportados encontrados");
    Ok(files)
}

/// Conteo de archivos por nivel de riesgo.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
    pub by_risk: BTreeMap<RiskLevel, usize>,
}

impl BatchSummary {
    pub fn record(&mut self, analysis: &AnalysisResult) {
        self.total += 1;
        *self.by_risk.entry(analysis.risk_level).or_insert(0) += 1;
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        self.by_risk.get(&level).copied().unwrap_or(0)
    }

    pub fn analyzed(&self) -> usize {
        self.total - self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::analysis::input::MetadataInput;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn only_supported_files_are_listed() {
        let dir = tempdir().expect("temp dir");
        fs::write(dir.path().join("b.jpg"), b"x").expect("write");
        fs::write(dir.path().join("a.PDF"), b"x").expect("write");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write");
        fs::create_dir(dir.path().join("nested")).expect("mkdir");
        fs::write(dir.path().join("nested").join("c.mp3"), b"x").expect("write");

        let shallow = find_supported_files(dir.path(), false).expect("shallow");
        let names: Vec<_> = shallow
            .iter()
            .filter_map(|path| path.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.jpg"]);

        let deep = find_supported_files(dir.path(), true).expect("deep");
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().expect("temp dir");
        assert!(find_supported_files(&dir.path().join("missing"), true).is_err());
    }

    #[test]
    fn summary_counts_levels_and_failures() {
        let mut summary = BatchSummary::default();
        let gps = MetadataInput::from_json_value(json!({
            "gps_data": {"latitude_decimal": 1.0, "longitude_decimal": 2.0}
        }));
        summary.record(&analyze(&gps));
        summary.record(&analyze(&MetadataInput::default()));
        summary.record_failure();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.analyzed(), 2);
        assert_eq!(summary.count(RiskLevel::Critical), 1);
        assert_eq!(summary.count(RiskLevel::Low), 1);
        assert_eq!(summary.count(RiskLevel::High), 0);
    }
}
