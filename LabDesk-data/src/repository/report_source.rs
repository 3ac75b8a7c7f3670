use crate::models::ReportPayload;
use super::errors::SourceError;

/// Read-only access to report payloads.
///
/// Implementations look reports up by the patient code the caller selected;
/// nothing is written back.
pub trait ReportSource {
    /// Fetch the report payload for a patient code
    fn fetch_report(&self, patient_code: &str) -> Result<Option<ReportPayload>, SourceError>;

    /// Patient codes available from this source, in source order
    fn patient_codes(&self) -> Result<Vec<String>, SourceError>;
}
