use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Storage-agnostic model of one test result as upstream sends it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestRecord {
    /// Upstream identifier, if any (numeric ids are stringified)
    #[serde(deserialize_with = "deserialize_text")]
    pub id: Option<String>,

    /// Display name of the test
    pub test_name: Option<String>,

    /// Section the test belongs to (e.g. "Biochemistry")
    pub test_category: Option<String>,

    /// Optional secondary grouping level
    pub test_subcategory: Option<String>,

    /// Measured value, numeric or qualitative
    #[serde(deserialize_with = "deserialize_text")]
    pub test_value: Option<String>,

    /// Display unit
    pub unit: Option<String>,

    /// Reference range expression
    pub normal_range: Option<String>,

    /// Older payloads carry the range under `ref`
    #[serde(rename = "ref")]
    pub legacy_range: Option<String>,

    /// Free-text note attached at entry time
    pub additional_note: Option<String>,
}

impl TestRecord {
    /// Reference range, preferring `normalRange` over the legacy `ref` key
    pub fn reference_range(&self) -> Option<&str> {
        first_present([self.normal_range.as_deref(), self.legacy_range.as_deref()])
    }
}

/// Patient block some payloads nest inside the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddedPatient {
    pub contact_number: Option<String>,
    pub ref_by: Option<String>,
}

/// Report payload for one patient, as produced by the report endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportPayload {
    pub patient_name: Option<String>,

    pub patient_code: Option<String>,

    /// Snake-case spelling used by the public report endpoint
    #[serde(rename = "patient_code")]
    pub patient_code_legacy: Option<String>,

    #[serde(deserialize_with = "deserialize_text")]
    pub patient_age: Option<String>,

    pub patient_gender: Option<String>,

    pub patient_contact: Option<String>,

    pub contact_number: Option<String>,

    pub ref_by: Option<String>,

    #[serde(rename = "ref_by")]
    pub ref_by_legacy: Option<String>,

    pub patient: Option<EmbeddedPatient>,

    /// Lab identity embedded by the public endpoint
    pub lab_name: Option<String>,
    pub lab_address: Option<String>,
    pub lab_phone: Option<String>,
    pub lab_email: Option<String>,

    pub tests: Vec<TestRecord>,
}

impl ReportPayload {
    /// Patient code under either spelling
    pub fn resolved_patient_code(&self) -> Option<&str> {
        first_present([
            self.patient_code.as_deref(),
            self.patient_code_legacy.as_deref(),
        ])
    }

    /// Contact number, checking the report then the nested patient block
    pub fn resolved_contact(&self) -> Option<&str> {
        first_present([
            self.patient_contact.as_deref(),
            self.contact_number.as_deref(),
            self.patient.as_ref().and_then(|p| p.contact_number.as_deref()),
        ])
    }

    /// Referring doctor, checking the report then the nested patient block
    pub fn resolved_ref_by(&self) -> Option<&str> {
        first_present([
            self.ref_by.as_deref(),
            self.ref_by_legacy.as_deref(),
            self.patient.as_ref().and_then(|p| p.ref_by.as_deref()),
        ])
    }
}

/// First candidate that is present and not blank
pub fn first_present<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

/// Accept a JSON string, number or boolean and keep it as text
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}
