// Wire models as they arrive from upstream services and files
pub mod lab_info;
pub mod report;

pub use lab_info::{LabInfoRecord, SignatoryRecord};
pub use report::{EmbeddedPatient, ReportPayload, TestRecord};
