// Testing utilities and fixtures for the domain layer
// This module is only available when the "mock" feature is enabled

use chrono::{DateTime, TimeZone, Utc};

use lab_desk_data::models::{EmbeddedPatient, ReportPayload, TestRecord};
use lab_desk_data::repository::{InMemoryReportSource, ReportSource, SourceError};

use crate::entities::lab_report::{LabProfile, Signatory};
use crate::services::assembly::ReportContext;

/// Patient code used by the sample payload
pub const SAMPLE_PATIENT_CODE: &str = "LAB-1001";

/// Fixed timestamp so rendered dates are stable
pub fn sample_generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
        .single()
        .unwrap_or_default()
}

/// A valid lab profile with signatory and director
pub fn sample_lab_profile() -> LabProfile {
    LabProfile {
        name: "Sunrise Diagnostics".to_string(),
        slogan: Some("Accurate results, every time".to_string()),
        address: Some("12 Market Road, Pune".to_string()),
        phone: Some("+91 20 5550 0101".to_string()),
        email: Some("reports@sunrise.example".to_string()),
        signatory: Some(Signatory {
            name: "Dr. K. Iyer".to_string(),
            credentials: Some("MD (Pathology)".to_string()),
            title: Some("Consultant Pathologist".to_string()),
        }),
        director: Some("S. Husain".to_string()),
    }
}

fn record(name: &str, category: &str, subcategory: Option<&str>, value: &str, unit: &str, range: &str) -> TestRecord {
    TestRecord {
        test_name: Some(name.to_string()),
        test_category: Some(category.to_string()),
        test_subcategory: subcategory.map(str::to_string),
        test_value: Some(value.to_string()),
        unit: Some(unit.to_string()),
        normal_range: Some(range.to_string()),
        ..TestRecord::default()
    }
}

/// A payload covering every range form the classifier reads
pub fn sample_payload(patient_code: &str) -> ReportPayload {
    ReportPayload {
        patient_name: Some("Meera Joshi".to_string()),
        patient_code: Some(patient_code.to_string()),
        patient_age: Some("42".to_string()),
        patient_gender: Some("Female".to_string()),
        patient: Some(EmbeddedPatient {
            contact_number: Some("98200 11111".to_string()),
            ref_by: Some("Dr. A. Shah".to_string()),
        }),
        tests: vec![
            record("Hemoglobin", "Hematology", Some("Complete Blood Count"), "10.8", "g/dL", "12–16"),
            record("Platelet Count", "Hematology", Some("Complete Blood Count"), "250000", "/cumm", "150000-450000"),
            record("ESR", "Hematology", None, "12", "mm/hr", "<20"),
            TestRecord {
                additional_note: Some("Non-fasting sample".to_string()),
                ..record("Fasting Glucose", "Biochemistry", None, "128", "mg/dL", "70-110")
            },
            record("HDL Cholesterol", "Biochemistry", Some("Lipid Profile"), "38", "mg/dL", ">40"),
            record("HIV I & II", "Serology", None, "Negative", "", "Negative"),
            TestRecord {
                test_name: Some("Urine Colour".to_string()),
                test_value: Some("Pale yellow".to_string()),
                ..TestRecord::default()
            },
        ],
        ..ReportPayload::default()
    }
}

/// In-memory source holding the sample payload
pub fn sample_source() -> InMemoryReportSource {
    InMemoryReportSource::with_reports(vec![sample_payload(SAMPLE_PATIENT_CODE)])
}

/// Context for the sample patient at the fixed timestamp
pub fn sample_context() -> ReportContext {
    ReportContext::new(SAMPLE_PATIENT_CODE, sample_lab_profile()).with_generated_at(sample_generated_at())
}

/// Report source that fails every call
#[derive(Debug, Clone, Default)]
pub struct FailingReportSource {
    message: String,
}

impl FailingReportSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ReportSource for FailingReportSource {
    fn fetch_report(&self, _patient_code: &str) -> Result<Option<ReportPayload>, SourceError> {
        Err(SourceError::Lock(self.message.clone()))
    }

    fn patient_codes(&self) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Lock(self.message.clone()))
    }
}
