use serde::{Deserialize, Serialize};

use super::classification::{ArrowKind, Severity, StatusKind};

/// Renderable model of one laboratory report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub header: ReportHeader,
    pub sections: Vec<ReportSection>,
    pub footer: ReportFooter,
    pub summary: ReportSummary,
}

impl ReportDocument {
    /// All rows in display order
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.sections
            .iter()
            .flat_map(|section| section.subsections.iter())
            .flat_map(|subsection| subsection.rows.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeader {
    pub lab: LabBlock,
    pub title: String,
    pub patient: PatientBlock,
    pub details: ReportDetails,
}

/// Lab identity as printed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabBlock {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slogan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Patient information panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientBlock {
    pub name: String,
    /// "{age} Years / {gender}"
    pub age_sex: String,
    pub patient_id: String,
    pub contact: String,
}

/// Report details panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetails {
    pub report_date: String,
    pub report_time: String,
    pub referred_by: String,
}

/// One category section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSection {
    /// Category key as grouped
    pub category: String,
    /// Heading as printed
    pub title: String,
    pub subsections: Vec<ReportSubsection>,
}

/// Rows sharing a subcategory. Untitled when subcategories are not used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubsection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rows: Vec<ReportRow>,
}

/// One test line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub test_name: String,
    pub result: String,
    pub unit: String,
    pub reference_range: String,
    pub status: StatusKind,
    pub status_label: String,
    pub arrow: ArrowKind,
    pub severity: Severity,
    pub color: String,

    /// Note entered with the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ReportRow {
    /// Status column text with its arrow, e.g. "High ↑"
    pub fn status_text(&self) -> String {
        let glyph = self.arrow.glyph();
        match (self.status_label.is_empty(), glyph.is_empty()) {
            (_, true) => self.status_label.clone(),
            (true, false) => glyph.to_string(),
            (false, false) => format!("{} {}", self.status_label, glyph),
        }
    }
}

/// Signature block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBlock {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Fixed closing matter of every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFooter {
    pub interpretation_title: String,
    pub interpretation_notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signatory: Option<SignatureBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_director: Option<String>,
    pub generated_note: String,
    pub generated_on: String,
    pub disclaimer_title: String,
    pub disclaimer: String,
    /// Already-encoded link to the online copy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
}

/// Counts over all rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_tests: usize,
    pub abnormal_tests: usize,
    pub unclassified_tests: usize,
}
