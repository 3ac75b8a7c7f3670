use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lab name used when neither the profile nor the payload carries one
pub const DEFAULT_LAB_NAME: &str = "Company Name";

/// One test result as consumed by the report core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Upstream identifier, if any
    pub id: Option<String>,

    /// Display label of the test
    pub test_name: String,

    /// Section the test is reported under
    pub test_category: Option<String>,

    /// Secondary grouping level
    pub test_subcategory: Option<String>,

    /// Raw measured value, numeric or qualitative
    pub test_value: String,

    /// Display-only unit
    pub unit: String,

    /// Reference range expression, possibly empty
    pub normal_range: String,

    /// Note entered with the result
    pub note: Option<String>,
}

impl TestResult {
    /// Create a result with the fields every report row needs
    pub fn new(
        test_name: impl Into<String>,
        test_category: Option<&str>,
        test_value: impl Into<String>,
        normal_range: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            test_name: test_name.into(),
            test_category: test_category.map(str::to_string),
            test_subcategory: None,
            test_value: test_value.into(),
            unit: String::new(),
            normal_range: normal_range.into(),
            note: None,
        }
    }

    /// Set the subcategory
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.test_subcategory = Some(subcategory.into());
        self
    }

    /// Set the unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// Who the report is about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIdentity {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub code: Option<String>,
    pub contact: Option<String>,
}

/// Everything one report is rendered from. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub patient: PatientIdentity,

    /// Test results in upstream order
    pub tests: Vec<TestResult>,

    /// Referring doctor
    pub referred_by: Option<String>,

    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Lab identity shipped inside the payload, if any
    pub embedded_lab: Option<LabProfile>,
}

/// Person signing the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signatory {
    pub name: String,
    pub credentials: Option<String>,
    pub title: Option<String>,
}

/// Lab identity printed in the report header and footer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LabProfile {
    /// Lab name shown as the report heading
    #[validate(length(min = 1, max = 200, message = "Lab name must be between 1 and 200 characters"))]
    pub name: String,

    /// Optional tagline under the name
    #[validate(length(max = 200, message = "Slogan cannot exceed 200 characters"))]
    pub slogan: Option<String>,

    pub address: Option<String>,

    pub phone: Option<String>,

    /// Contact email
    #[validate(email(message = "Lab email must be a valid email address"))]
    pub email: Option<String>,

    pub signatory: Option<Signatory>,

    pub director: Option<String>,
}

impl LabProfile {
    /// Profile with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Lay `embedded` over this profile. Present, non-blank embedded values win.
    pub fn overlay(&self, embedded: &LabProfile) -> LabProfile {
        fn pick(over: &Option<String>, base: &Option<String>) -> Option<String> {
            over.as_ref()
                .filter(|value| !value.trim().is_empty())
                .or(base.as_ref())
                .cloned()
        }

        LabProfile {
            name: if embedded.name.trim().is_empty() {
                self.name.clone()
            } else {
                embedded.name.clone()
            },
            slogan: pick(&embedded.slogan, &self.slogan),
            address: pick(&embedded.address, &self.address),
            phone: pick(&embedded.phone, &self.phone),
            email: pick(&embedded.email, &self.email),
            signatory: embedded.signatory.clone().or_else(|| self.signatory.clone()),
            director: pick(&embedded.director, &self.director),
        }
    }

    /// Name to print, falling back to the placeholder when blank
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_LAB_NAME
        } else {
            &self.name
        }
    }
}
