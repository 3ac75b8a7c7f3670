use chrono::{DateTime, Utc};
use lab_desk_data::models::{LabInfoRecord, ReportPayload, TestRecord};
use lab_desk_data::models::report::first_present;

use crate::entities::lab_report::{LabProfile, DEFAULT_LAB_NAME, PatientIdentity, ReportData, Signatory, TestResult};

// Conversion functions between data models and domain entities.
// They follow the pattern convert_to_[target_layer]_[model_name].

fn present(value: Option<&str>) -> Option<String> {
    first_present([value]).map(str::to_string)
}

/// Convert an upstream test record to a domain test result
pub fn convert_to_domain_test(record: TestRecord) -> TestResult {
    let normal_range = record.reference_range().unwrap_or_default().to_string();

    TestResult {
        id: record.id,
        test_name: record.test_name.unwrap_or_default(),
        test_category: present(record.test_category.as_deref()),
        test_subcategory: present(record.test_subcategory.as_deref()),
        test_value: record.test_value.unwrap_or_default(),
        unit: record.unit.unwrap_or_default(),
        normal_range,
        note: present(record.additional_note.as_deref()),
    }
}

/// Convert an upstream report payload to domain report data
pub fn convert_to_domain_report(payload: ReportPayload, generated_at: DateTime<Utc>) -> ReportData {
    let patient = PatientIdentity {
        name: present(payload.patient_name.as_deref()),
        age: present(payload.patient_age.as_deref()),
        gender: present(payload.patient_gender.as_deref()),
        code: present(payload.resolved_patient_code()),
        contact: present(payload.resolved_contact()),
    };
    let referred_by = present(payload.resolved_ref_by());
    let embedded_lab = convert_embedded_lab(&payload);

    ReportData {
        patient,
        tests: payload.tests.into_iter().map(convert_to_domain_test).collect(),
        referred_by,
        generated_at,
        embedded_lab,
    }
}

/// Lab fields the public report payload carries inline
fn convert_embedded_lab(payload: &ReportPayload) -> Option<LabProfile> {
    let fields = [
        payload.lab_name.as_deref(),
        payload.lab_address.as_deref(),
        payload.lab_phone.as_deref(),
        payload.lab_email.as_deref(),
    ];
    if first_present(fields).is_none() {
        return None;
    }

    Some(LabProfile {
        name: present(payload.lab_name.as_deref()).unwrap_or_default(),
        address: present(payload.lab_address.as_deref()),
        phone: present(payload.lab_phone.as_deref()),
        email: present(payload.lab_email.as_deref()),
        ..LabProfile::default()
    })
}

/// Convert a stored lab record to a domain lab profile
pub fn convert_to_domain_lab_profile(record: LabInfoRecord) -> LabProfile {
    let signatory = record.signatory.and_then(|signatory| {
        present(signatory.name.as_deref()).map(|name| Signatory {
            name,
            credentials: present(signatory.credentials.as_deref()),
            title: present(signatory.title.as_deref()),
        })
    });

    LabProfile {
        name: present(record.name.as_deref()).unwrap_or_else(|| DEFAULT_LAB_NAME.to_string()),
        slogan: present(record.slogan.as_deref()),
        address: present(record.address.as_deref()),
        phone: present(record.phone.as_deref()),
        email: present(record.email.as_deref()),
        signatory,
        director: present(record.director.as_deref()),
    }
}
