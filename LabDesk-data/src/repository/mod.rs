// Repository module structure
pub mod errors;
mod in_memory;
mod json_file;
mod report_source;

// Re-export commonly used types
pub use errors::SourceError;
pub use in_memory::InMemoryReportSource;
pub use json_file::{load_lab_info, JsonFileReportSource};
pub use report_source::ReportSource;
