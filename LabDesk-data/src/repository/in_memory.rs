use std::sync::{Arc, Mutex};

use crate::models::ReportPayload;
use super::errors::SourceError;
use super::report_source::ReportSource;

/// In-memory report source
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportSource {
    /// Payloads in insertion order
    reports: Arc<Mutex<Vec<ReportPayload>>>,
}

impl InMemoryReportSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding the given payloads
    pub fn with_reports(reports: Vec<ReportPayload>) -> Self {
        Self {
            reports: Arc::new(Mutex::new(reports)),
        }
    }

    /// Add a payload to the source
    pub fn insert(&self, report: ReportPayload) -> Result<(), SourceError> {
        let mut store = self.reports.lock()?;
        store.push(report);
        Ok(())
    }

    /// Number of payloads held
    pub fn len(&self) -> Result<usize, SourceError> {
        Ok(self.reports.lock()?.len())
    }

    /// Whether the source holds no payloads
    pub fn is_empty(&self) -> Result<bool, SourceError> {
        Ok(self.reports.lock()?.is_empty())
    }
}

impl ReportSource for InMemoryReportSource {
    fn fetch_report(&self, patient_code: &str) -> Result<Option<ReportPayload>, SourceError> {
        let store = self.reports.lock()?;
        let wanted = patient_code.trim();
        Ok(store
            .iter()
            .find(|report| report.resolved_patient_code().map(str::trim) == Some(wanted))
            .cloned())
    }

    fn patient_codes(&self) -> Result<Vec<String>, SourceError> {
        let store = self.reports.lock()?;
        Ok(store
            .iter()
            .filter_map(|report| report.resolved_patient_code())
            .map(|code| code.trim().to_string())
            .collect())
    }
}
