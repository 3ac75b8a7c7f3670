use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::models::{LabInfoRecord, ReportPayload};
use super::errors::SourceError;
use super::in_memory::InMemoryReportSource;
use super::report_source::ReportSource;

/// A report file holds either one payload or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum ReportFile {
    Many(Vec<ReportPayload>),
    One(Box<ReportPayload>),
}

/// Report source backed by a JSON file, loaded once when opened
#[derive(Debug, Clone)]
pub struct JsonFileReportSource {
    path: PathBuf,
    reports: InMemoryReportSource,
}

impl JsonFileReportSource {
    /// Open and decode a report file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let raw = read_file(&path)?;
        let reports = match serde_json::from_str::<ReportFile>(&raw)? {
            ReportFile::Many(reports) => reports,
            ReportFile::One(report) => vec![*report],
        };
        debug!("Loaded {} report payload(s) from {}", reports.len(), path.display());

        Ok(Self {
            path,
            reports: InMemoryReportSource::with_reports(reports),
        })
    }

    /// Path the source was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSource for JsonFileReportSource {
    fn fetch_report(&self, patient_code: &str) -> Result<Option<ReportPayload>, SourceError> {
        self.reports.fetch_report(patient_code)
    }

    fn patient_codes(&self) -> Result<Vec<String>, SourceError> {
        self.reports.patient_codes()
    }
}

/// Load a lab profile from a JSON file
pub fn load_lab_info(path: impl AsRef<Path>) -> Result<LabInfoRecord, SourceError> {
    let path = path.as_ref();
    let raw = read_file(path)?;
    let record = serde_json::from_str(&raw)?;
    debug!("Loaded lab profile from {}", path.display());
    Ok(record)
}

fn read_file(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
