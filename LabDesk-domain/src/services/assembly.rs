use chrono::{DateTime, Utc};
use lab_desk_data::models::report::first_present;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::classification::{Severity, StatusKind};
use crate::entities::document::{
    LabBlock, PatientBlock, ReportDetails, ReportDocument, ReportFooter, ReportHeader, ReportRow,
    ReportSection, ReportSubsection, ReportSummary, SignatureBlock,
};
use crate::entities::lab_report::{LabProfile, ReportData, TestResult};
use crate::services::classifier::{classify_test, ClassificationStrategy};
use crate::services::grouping::{group_tests, GroupingLayout};

pub const REPORT_TITLE: &str = "LABORATORY INVESTIGATION REPORT";

pub const INTERPRETATION_TITLE: &str = "CLINICAL INTERPRETATION";

pub const INTERPRETATION_NOTES: [&str; 3] = [
    "Values marked with ↑ (High) or ↓ (Low) are outside the reference range",
    "Reference ranges may vary based on age, gender, and laboratory methodology",
    "Please correlate with clinical findings and consult your physician for interpretation",
];

pub const GENERATED_NOTE: &str = "This is a computer generated report";

pub const DISCLAIMER_TITLE: &str = "IMPORTANT MEDICAL DISCLAIMER:";

pub const DISCLAIMER: &str = "This report contains confidential medical information. \
The results should be interpreted by a qualified healthcare professional in conjunction with \
clinical history and other diagnostic tests. Normal values may vary between laboratories due to \
differences in equipment, reagents, and methodologies. For any queries regarding this report, \
please contact our laboratory at the above mentioned contact details.";

/// Printed in place of a missing identity field
pub const MISSING_FIELD: &str = "-";

const FLAT_SECTION_SUFFIX: &str = " PROFILE";
const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Everything a report is rendered with besides its data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContext {
    /// Patient the report is for
    pub patient_code: String,

    /// Configured lab identity, overlaid by any lab fields in the payload
    pub lab: LabProfile,

    pub layout: GroupingLayout,

    pub strategy: ClassificationStrategy,

    /// Finished link to the online copy, printed as given
    pub share_link: Option<String>,

    /// Timestamp printed on the report
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(patient_code: impl Into<String>, lab: LabProfile) -> Self {
        Self {
            patient_code: patient_code.into(),
            lab,
            layout: GroupingLayout::default(),
            strategy: ClassificationStrategy::default(),
            share_link: None,
            generated_at: Utc::now(),
        }
    }

    pub fn with_layout(mut self, layout: GroupingLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_strategy(mut self, strategy: ClassificationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_share_link(mut self, share_link: impl Into<String>) -> Self {
        self.share_link = Some(share_link.into());
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

/// Build the document for `data` under `context`.
///
/// Pure: grouping and classification run here, nothing is read from outside
/// the two arguments.
pub fn assemble_report(data: &ReportData, context: &ReportContext) -> ReportDocument {
    let lab = match &data.embedded_lab {
        Some(embedded) => context.lab.overlay(embedded),
        None => context.lab.clone(),
    };

    let sections = build_sections(&data.tests, context);
    let summary = summarize(sections.iter().flat_map(|section| {
        section.subsections.iter().flat_map(|subsection| subsection.rows.iter())
    }));

    let report_date = context.generated_at.format(DATE_FORMAT).to_string();
    let report_time = context.generated_at.format(TIME_FORMAT).to_string();

    let header = ReportHeader {
        lab: LabBlock {
            name: lab.display_name().to_string(),
            slogan: lab.slogan.clone(),
            address: lab.address.clone(),
            phone: lab.phone.clone(),
            email: lab.email.clone(),
        },
        title: REPORT_TITLE.to_string(),
        patient: PatientBlock {
            name: or_missing(data.patient.name.as_deref()),
            age_sex: format!(
                "{} Years / {}",
                or_missing(data.patient.age.as_deref()),
                or_missing(data.patient.gender.as_deref())
            ),
            patient_id: or_missing(first_present([
                data.patient.code.as_deref(),
                Some(context.patient_code.as_str()),
            ])),
            contact: or_missing(data.patient.contact.as_deref()),
        },
        details: ReportDetails {
            report_date: report_date.clone(),
            report_time: report_time.clone(),
            referred_by: or_missing(data.referred_by.as_deref()),
        },
    };

    let footer = ReportFooter {
        interpretation_title: INTERPRETATION_TITLE.to_string(),
        interpretation_notes: INTERPRETATION_NOTES.iter().map(|note| note.to_string()).collect(),
        signatory: lab.signatory.as_ref().map(|signatory| SignatureBlock {
            name: signatory.name.clone(),
            credentials: signatory.credentials.clone(),
            title: signatory.title.clone(),
        }),
        lab_director: lab.director.clone(),
        generated_note: GENERATED_NOTE.to_string(),
        generated_on: format!("Report generated on: {}, {}", report_date, report_time),
        disclaimer_title: DISCLAIMER_TITLE.to_string(),
        disclaimer: DISCLAIMER.to_string(),
        share_link: context.share_link.clone(),
    };

    debug!(
        patient_code = %context.patient_code,
        sections = sections.len(),
        total = summary.total_tests,
        abnormal = summary.abnormal_tests,
        "assembled report"
    );

    ReportDocument {
        header,
        sections,
        footer,
        summary,
    }
}

fn build_sections(tests: &[TestResult], context: &ReportContext) -> Vec<ReportSection> {
    let grouped = group_tests(tests.iter().cloned(), context.layout.uses_subcategories());

    grouped
        .iter()
        .map(|(category, subgroups)| {
            let mut title = category.to_uppercase();
            if context.layout == GroupingLayout::Flat {
                title.push_str(FLAT_SECTION_SUFFIX);
            }

            let subsections = subgroups
                .iter()
                .map(|(subcategory, members)| ReportSubsection {
                    title: subcategory.clone(),
                    rows: members.iter().map(|test| build_row(test, context.strategy)).collect(),
                })
                .collect();

            ReportSection {
                category: category.to_string(),
                title,
                subsections,
            }
        })
        .collect()
}

/// One table row for a test
pub fn build_row(test: &TestResult, strategy: ClassificationStrategy) -> ReportRow {
    let classification = classify_test(test, strategy);
    let severity = classification.severity();

    ReportRow {
        test_name: test.test_name.clone(),
        result: test.test_value.clone(),
        unit: test.unit.clone(),
        reference_range: test.normal_range.clone(),
        status: classification.status,
        status_label: classification.label,
        arrow: classification.arrow,
        severity,
        color: severity.color().to_string(),
        note: test.note.clone(),
    }
}

/// Count rows by outcome
pub fn summarize<'a>(rows: impl IntoIterator<Item = &'a ReportRow>) -> ReportSummary {
    rows.into_iter().fold(ReportSummary::default(), |mut summary, row| {
        summary.total_tests += 1;
        if row.status.severity() == Severity::Abnormal {
            summary.abnormal_tests += 1;
        }
        if row.status == StatusKind::Unclassified {
            summary.unclassified_tests += 1;
        }
        summary
    })
}

fn or_missing(value: Option<&str>) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(MISSING_FIELD)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::entities::classification::ArrowKind;
    use crate::entities::lab_report::{PatientIdentity, Signatory};

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    fn report_data() -> ReportData {
        ReportData {
            patient: PatientIdentity {
                name: Some("Asha Rao".to_string()),
                age: Some("34".to_string()),
                gender: Some("Female".to_string()),
                code: Some("P-0042".to_string()),
                contact: None,
            },
            tests: vec![
                TestResult::new("Hemoglobin", Some("Hematology"), "11.2", "12–16")
                    .with_subcategory("CBC")
                    .with_unit("g/dL"),
                TestResult::new("Glucose (Fasting)", Some("Biochemistry"), "95", "70-110"),
                TestResult::new("Platelets", Some("Hematology"), "250", "150-400").with_subcategory("CBC"),
                TestResult::new("HBsAg", None, "Reactive", "Negative"),
            ],
            referred_by: Some("Dr. Mehta".to_string()),
            generated_at: generated_at(),
            embedded_lab: None,
        }
    }

    fn context() -> ReportContext {
        let mut lab = LabProfile::named("Sunrise Diagnostics");
        lab.signatory = Some(Signatory {
            name: "Dr. K. Iyer".to_string(),
            credentials: Some("MD".to_string()),
            title: Some("Consultant Pathologist".to_string()),
        });
        ReportContext::new("P-0042", lab).with_generated_at(generated_at())
    }

    #[test]
    fn test_header_fields() {
        let document = assemble_report(&report_data(), &context());
        let header = &document.header;

        assert_eq!(header.title, REPORT_TITLE);
        assert_eq!(header.lab.name, "Sunrise Diagnostics");
        assert_eq!(header.patient.age_sex, "34 Years / Female");
        assert_eq!(header.patient.patient_id, "P-0042");
        assert_eq!(header.patient.contact, MISSING_FIELD);
        assert_eq!(header.details.report_date, "05/03/2024");
        assert_eq!(header.details.report_time, "14:07:09");
        assert_eq!(header.details.referred_by, "Dr. Mehta");
    }

    #[test]
    fn test_nested_sections() {
        let document = assemble_report(&report_data(), &context());
        let titles: Vec<_> = document.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["HEMATOLOGY", "BIOCHEMISTRY", "OTHER"]);

        let hematology = &document.sections[0];
        assert_eq!(hematology.subsections.len(), 1);
        assert_eq!(hematology.subsections[0].title.as_deref(), Some("CBC"));

        let hemoglobin = &hematology.subsections[0].rows[0];
        assert_eq!(hemoglobin.status, StatusKind::Low);
        assert_eq!(hemoglobin.arrow, ArrowKind::Down);
        assert_eq!(hemoglobin.color, "#d32f2f");
        assert_eq!(hemoglobin.unit, "g/dL");
    }

    #[test]
    fn test_flat_layout_titles() {
        let document = assemble_report(
            &report_data(),
            &context().with_layout(GroupingLayout::Flat),
        );
        assert_eq!(document.sections[0].title, "HEMATOLOGY PROFILE");
        assert!(document.sections.iter().all(|s| s.subsections.len() == 1));
        assert!(document.sections[0].subsections[0].title.is_none());
    }

    #[test]
    fn test_qualitative_row_keeps_raw_value_label() {
        let document = assemble_report(&report_data(), &context());
        let row = document.rows().find(|row| row.test_name == "HBsAg").unwrap();
        assert_eq!(row.status, StatusKind::Unclassified);
        assert_eq!(row.status_label, "Reactive");
        assert_eq!(row.color, "#222222");
    }

    #[test]
    fn test_row_carries_note() {
        let mut glucose = TestResult::new("Glucose", Some("Biochemistry"), "128", "70-110");
        glucose.note = Some("Non-fasting sample".to_string());

        let row = build_row(&glucose, ClassificationStrategy::Standard);
        assert_eq!(row.note.as_deref(), Some("Non-fasting sample"));

        let esr = TestResult::new("ESR", Some("Hematology"), "12", "<20");
        assert!(build_row(&esr, ClassificationStrategy::Standard).note.is_none());
    }

    #[test]
    fn test_summary_counts() {
        let document = assemble_report(&report_data(), &context());
        assert_eq!(
            document.summary,
            ReportSummary {
                total_tests: 4,
                abnormal_tests: 1,
                unclassified_tests: 1,
            }
        );
    }

    #[test]
    fn test_footer_content() {
        let document = assemble_report(
            &report_data(),
            &context().with_share_link("http://localhost:5173/view-report/P-0042"),
        );
        let footer = &document.footer;

        assert_eq!(footer.interpretation_notes.len(), 3);
        assert_eq!(footer.generated_on, "Report generated on: 05/03/2024, 14:07:09");
        assert_eq!(footer.signatory.as_ref().unwrap().name, "Dr. K. Iyer");
        assert_eq!(footer.share_link.as_deref(), Some("http://localhost:5173/view-report/P-0042"));
        assert!(footer.disclaimer.starts_with("This report contains confidential medical information."));
    }

    #[test]
    fn test_embedded_lab_overrides_configured_lab() {
        let mut data = report_data();
        data.embedded_lab = Some(LabProfile::named("Payload Lab"));

        let document = assemble_report(&data, &context());
        assert_eq!(document.header.lab.name, "Payload Lab");
        assert!(document.footer.signatory.is_some());
    }

    #[test]
    fn test_empty_report() {
        let mut data = report_data();
        data.tests.clear();
        data.patient = PatientIdentity::default();

        let document = assemble_report(&data, &ReportContext::new("P-9", LabProfile::default()));
        assert!(document.sections.is_empty());
        assert_eq!(document.summary.total_tests, 0);
        assert_eq!(document.header.lab.name, "Company Name");
        assert_eq!(document.header.patient.age_sex, "- Years / -");
        assert_eq!(document.header.patient.patient_id, "P-9");
    }
}
