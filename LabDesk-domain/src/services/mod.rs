pub mod assembly;
pub mod classifier;
pub mod grouping;
pub mod reference_range;
pub mod report;

// Domain services
// Pure report logic plus the service that wires it to a report source.

// Re-export service traits and factory functions
pub use assembly::{assemble_report, ReportContext};
pub use classifier::{
    classify, classify_test, classify_with, BoundInclusivity, ClassificationStrategy, ClassifierPolicy,
    NonNumericOutcome,
};
pub use grouping::{group_tests, GroupedTests, GroupingLayout, FALLBACK_CATEGORY};
pub use reference_range::{leading_number, RangeDialect, ReferenceRange};
pub use report::{
    create_file_report_service, create_in_memory_report_service, create_report_service, ReportService,
    ReportServiceError, ReportServiceTrait,
};
