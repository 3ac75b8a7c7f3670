// Domain entities and value objects
pub mod classification;
pub mod conversions;
pub mod document;
pub mod lab_report;

// Re-export common types for easier imports
pub use classification::{ArrowKind, Classification, Severity, StatusKind};
pub use document::{
    LabBlock, PatientBlock, ReportDetails, ReportDocument, ReportFooter, ReportHeader, ReportRow,
    ReportSection, ReportSubsection, ReportSummary, SignatureBlock,
};
pub use lab_report::{LabProfile, PatientIdentity, ReportData, Signatory, TestResult};
