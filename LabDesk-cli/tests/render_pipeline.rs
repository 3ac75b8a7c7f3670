use std::fs;

use lab_desk_cli::cli::{FormatArg, LayoutArg, RenderArgs};
use lab_desk_cli::commands::{list_patient_codes, run_render};
use lab_desk_cli::config::{parse_base_url, Settings};
use lab_desk_cli::share::{public_report_link, whatsapp_share_url};
use lab_desk_domain::services::{ClassificationStrategy, GroupingLayout};
use lab_desk_domain::testing::{sample_lab_profile, sample_payload, SAMPLE_PATIENT_CODE};
use tempfile::tempdir;

// Initialize tracing once for all tests
static INIT: std::sync::Once = std::sync::Once::new();
fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

fn settings() -> Settings {
    Settings {
        public_base_url: parse_base_url("https://reports.sunrise.example").unwrap(),
        lab_profile: None,
        strategy: ClassificationStrategy::Standard,
        layout: GroupingLayout::Nested,
    }
}

#[test]
fn test_render_to_file_with_lab_profile() {
    initialize();
    let dir = tempdir().unwrap();

    let input = dir.path().join("reports.json");
    let payloads = vec![sample_payload(SAMPLE_PATIENT_CODE), sample_payload("LAB-2002")];
    fs::write(&input, serde_json::to_vec(&payloads).unwrap()).unwrap();

    let lab_path = dir.path().join("lab.json");
    fs::write(&lab_path, serde_json::to_vec(&sample_lab_profile()).unwrap()).unwrap();

    let output = dir.path().join("report.txt");
    let args = RenderArgs {
        input: input.clone(),
        patient: "LAB-2002".to_string(),
        lab_profile: Some(lab_path),
        format: FormatArg::Text,
        layout: Some(LayoutArg::Flat),
        strategy: None,
        public_base_url: None,
        no_share_link: false,
        output: Some(output.clone()),
    };

    run_render(&args, &settings(), true).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("SUNRISE DIAGNOSTICS"));
    assert!(text.contains("Patient ID: LAB-2002"));
    assert!(text.contains("HEMATOLOGY PROFILE"));
    assert!(text.contains("OTHER PROFILE"));
    assert!(text.contains("View online: https://reports.sunrise.example/view-report/LAB-2002"));
    assert!(text.contains("DR. K. IYER"));
    assert!(text.contains("Lab Director: S. Husain"));
    assert!(!text.contains('\u{1b}'));

    assert_eq!(list_patient_codes(&input).unwrap(), vec![SAMPLE_PATIENT_CODE, "LAB-2002"]);
}

#[test]
fn test_share_links_for_rendered_patient() {
    let base = parse_base_url("http://192.168.1.20:5173").unwrap();
    let link = public_report_link(&base, SAMPLE_PATIENT_CODE).unwrap();

    assert_eq!(link.as_str(), "http://192.168.1.20:5173/view-report/LAB-1001");
    assert!(whatsapp_share_url(link.as_str()).starts_with("https://wa.me/?text=Check%20out%20this%20report%3A%20"));
}
