//! Loading parsed usage reports from JSON.

use std::path::Path;

use retrofit_core::Report;
use tracing::debug;

use crate::StoreError;

/// Load a report. A blank `source` is filled from the file stem.
///
/// A report is explicit input, so a missing or malformed file is an error.
pub fn load_report(path: &Path) -> Result<Report, StoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut report: Report =
        serde_json::from_str(&text).map_err(|source| StoreError::InvalidReport {
            path: path.to_path_buf(),
            source,
        })?;

    if report.source.trim().is_empty()
        && let Some(stem) = path.file_stem()
    {
        report.source = stem.to_string_lossy().into_owned();
    }
    debug!(
        path = %path.display(),
        source = %report.source,
        frictions = report.frictions.len(),
        rules = report.rules.len(),
        "loaded report"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn source_defaults_to_file_stem() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ana.json");
        std::fs::write(&path, r#"{"frictions": [{"title": "Slow builds"}]}"#).unwrap();

        let report = load_report(&path).unwrap();
        assert_eq!(report.source, "ana");
        assert_eq!(report.frictions.len(), 1);
    }

    #[test]
    fn explicit_source_kept() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.json");
        std::fs::write(&path, r#"{"source": "ben", "rules": [{"code": "Pin versions"}]}"#).unwrap();
        assert_eq!(load_report(&path).unwrap().source, "ben");
    }

    #[test]
    fn missing_report_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_report(&tmp.path().join("absent.json")),
            Err(StoreError::Read { .. })
        ));
    }

    #[test]
    fn malformed_report_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, r#"{"frictions": "nope"}"#).unwrap();
        assert!(matches!(
            load_report(&path),
            Err(StoreError::InvalidReport { .. })
        ));
    }
}
