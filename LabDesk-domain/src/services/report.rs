use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use lab_desk_data::models::ReportPayload;
use lab_desk_data::repository::{InMemoryReportSource, JsonFileReportSource, ReportSource, SourceError};

use crate::entities::classification::Classification;
use crate::entities::conversions;
use crate::entities::document::ReportDocument;
use crate::entities::lab_report::{LabProfile, ReportData, TestResult, DEFAULT_LAB_NAME};
use crate::services::assembly::{assemble_report, ReportContext};
use crate::services::classifier::{classify_with, ClassificationStrategy};
use crate::services::grouping::{group_tests, GroupedTests, GroupingLayout};

/// Report service errors
#[derive(Debug, Error)]
pub enum ReportServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No report for the requested patient
    #[error("Report not found: {0}")]
    NotFound(String),

    /// Report source error
    #[error("Source error: {0}")]
    SourceError(String),
}

/// Trait for report service operations
pub trait ReportServiceTrait {
    /// Validate a lab profile before it is printed on a report
    fn validate_lab_profile(&self, profile: &LabProfile) -> Result<(), ReportServiceError>;

    /// Classify one value against its reference range
    fn classify_result(&self, value: &str, reference_range: &str, strategy: ClassificationStrategy) -> Classification;

    /// Group test results for display
    fn group_results(&self, tests: Vec<TestResult>, layout: GroupingLayout) -> GroupedTests;

    /// Build a document from report data already in hand
    fn assemble(&self, data: &ReportData, context: &ReportContext) -> ReportDocument;

    /// Patient codes the source can report on
    fn list_patients(&self) -> Result<Vec<String>, ReportServiceError>;

    /// Fetch and convert the report data for a patient
    fn fetch_report_data(
        &self,
        patient_code: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportData, ReportServiceError>;

    /// Fetch, validate and assemble the report described by `context`
    fn generate_report(&self, context: &ReportContext) -> Result<ReportDocument, ReportServiceError>;
}

/// Report service over a report source
pub struct ReportService<S: ReportSource> {
    source: S,
}

impl<S: ReportSource> ReportService<S> {
    /// Create a new report service
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Map source errors to service errors
    fn map_source_error(&self, err: SourceError) -> ReportServiceError {
        error!("Report source error: {}", err);
        ReportServiceError::SourceError(err.to_string())
    }
}

impl<S: ReportSource> ReportServiceTrait for ReportService<S> {
    fn validate_lab_profile(&self, profile: &LabProfile) -> Result<(), ReportServiceError> {
        if let Err(validation_errors) = profile.validate() {
            let mut fields: Vec<String> = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors
                        .iter()
                        .map(|err| match &err.message {
                            Some(msg) => msg.to_string(),
                            None => format!("Invalid {}", field),
                        })
                        .collect();
                    format!("{}: {}", field, error_msgs.join(", "))
                })
                .collect();
            fields.sort();

            return Err(ReportServiceError::ValidationError(fields.join("; ")));
        }

        Ok(())
    }

    fn classify_result(&self, value: &str, reference_range: &str, strategy: ClassificationStrategy) -> Classification {
        classify_with(value, reference_range, strategy.policy())
    }

    fn group_results(&self, tests: Vec<TestResult>, layout: GroupingLayout) -> GroupedTests {
        group_tests(tests, layout.uses_subcategories())
    }

    fn assemble(&self, data: &ReportData, context: &ReportContext) -> ReportDocument {
        assemble_report(data, context)
    }

    fn list_patients(&self) -> Result<Vec<String>, ReportServiceError> {
        self.source
            .patient_codes()
            .map_err(|e| self.map_source_error(e))
    }

    #[instrument(skip(self, generated_at))]
    fn fetch_report_data(
        &self,
        patient_code: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportData, ReportServiceError> {
        let code = patient_code.trim();
        if code.is_empty() {
            return Err(ReportServiceError::ValidationError(
                "Patient code must not be empty".to_string(),
            ));
        }

        let payload = self
            .source
            .fetch_report(code)
            .map_err(|e| self.map_source_error(e))?
            .ok_or_else(|| {
                warn!("No report payload for patient {}", code);
                ReportServiceError::NotFound(format!("No report for patient code {}", code))
            })?;

        debug!(tests = payload.tests.len(), "fetched report payload");
        Ok(conversions::convert_to_domain_report(payload, generated_at))
    }

    #[instrument(skip(self, context), fields(patient_code = %context.patient_code, strategy = %context.strategy))]
    fn generate_report(&self, context: &ReportContext) -> Result<ReportDocument, ReportServiceError> {
        let data = self.fetch_report_data(&context.patient_code, context.generated_at)?;

        let mut printed_lab = match &data.embedded_lab {
            Some(embedded) => context.lab.overlay(embedded),
            None => context.lab.clone(),
        };
        if printed_lab.name.trim().is_empty() {
            debug!("No lab name configured - using placeholder name.");
            printed_lab.name = DEFAULT_LAB_NAME.to_string();
        }
        self.validate_lab_profile(&printed_lab)?;

        let document = self.assemble(&data, context);
        info!(
            total = document.summary.total_tests,
            abnormal = document.summary.abnormal_tests,
            "Report generated"
        );
        Ok(document)
    }
}

/// Create a report service over any source
pub fn create_report_service<S: ReportSource>(source: S) -> impl ReportServiceTrait {
    ReportService::new(source)
}

/// Create a report service reading payloads from a JSON file
pub fn create_file_report_service(
    path: impl AsRef<Path>,
) -> Result<ReportService<JsonFileReportSource>, ReportServiceError> {
    let source = JsonFileReportSource::open(path).map_err(|e| {
        error!("Failed to open report file: {}", e);
        ReportServiceError::SourceError(e.to_string())
    })?;
    info!(path = %source.path().display(), "Report file opened");
    Ok(ReportService::new(source))
}

/// Create a report service over payloads held in memory
pub fn create_in_memory_report_service(reports: Vec<ReportPayload>) -> ReportService<InMemoryReportSource> {
    ReportService::new(InMemoryReportSource::with_reports(reports))
}
