use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use tracing::{debug, info};

use lab_desk_data::repository::{load_lab_info, JsonFileReportSource, ReportSource};
use lab_desk_domain::entities::conversions::convert_to_domain_lab_profile;
use lab_desk_domain::entities::lab_report::DEFAULT_LAB_NAME;
use lab_desk_domain::entities::{Classification, LabProfile, ReportDocument};
use lab_desk_domain::services::{
    create_file_report_service, ClassificationStrategy, ReportContext, ReportServiceTrait,
};

use crate::cli::{ClassifyArgs, PatientsArgs, RenderArgs};
use crate::config::{parse_base_url, Settings};
use crate::export::{exporter_for, OutputFormat};
use crate::share::{public_report_link, whatsapp_share_url};

/// What a render produced
#[derive(Debug)]
pub struct RenderedReport {
    pub document: ReportDocument,
    pub bytes: Vec<u8>,
    pub share_link: Option<String>,
}

/// Load the lab profile from `path`, or a placeholder profile when none is given
pub fn load_lab_profile(path: Option<&Path>) -> Result<LabProfile> {
    match path {
        Some(path) => {
            let record = load_lab_info(path)
                .with_context(|| format!("Failed to load lab profile from {}", path.display()))?;
            Ok(convert_to_domain_lab_profile(record))
        }
        None => {
            debug!("No lab profile configured - using placeholder name.");
            Ok(LabProfile::named(DEFAULT_LAB_NAME))
        }
    }
}

/// Build the report described by `args` without writing it anywhere
pub fn render_report(args: &RenderArgs, settings: &Settings, styled: bool) -> Result<RenderedReport> {
    let lab_path = args.lab_profile.as_deref().or(settings.lab_profile.as_deref());
    let lab = load_lab_profile(lab_path)?;

    let layout = args.layout.map(Into::into).unwrap_or(settings.layout);
    let strategy = args.strategy.map(Into::into).unwrap_or(settings.strategy);

    let patient = args.patient.trim();
    let share_link = if args.no_share_link {
        None
    } else {
        let base = match &args.public_base_url {
            Some(value) => parse_base_url(value)?,
            None => settings.public_base_url.clone(),
        };
        Some(public_report_link(&base, patient)?.to_string())
    };

    let mut context = ReportContext::new(patient, lab)
        .with_layout(layout)
        .with_strategy(strategy)
        .with_generated_at(Utc::now());
    if let Some(link) = &share_link {
        context = context.with_share_link(link.clone());
    }

    let service = create_file_report_service(&args.input)
        .with_context(|| format!("Failed to open report file {}", args.input.display()))?;
    let document = service
        .generate_report(&context)
        .with_context(|| format!("Failed to generate report for patient {}", args.patient))?;

    let exporter = exporter_for(OutputFormat::from(args.format), styled);
    let bytes = exporter
        .export(&document)
        .with_context(|| format!("Failed to export report as {}", exporter.format_name()))?;

    Ok(RenderedReport {
        document,
        bytes,
        share_link,
    })
}

/// `labdesk render`
pub fn run_render(args: &RenderArgs, settings: &Settings, styled: bool) -> Result<()> {
    let rendered = render_report(args, settings, styled && args.output.is_none())?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&rendered.bytes)?;
            writer.flush()?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered.bytes)?;
            stdout.flush()?;
        }
    }

    let summary = rendered.document.summary;
    info!(
        total = summary.total_tests,
        abnormal = summary.abnormal_tests,
        unclassified = summary.unclassified_tests,
        "Rendered report for {}",
        args.patient
    );
    if let Some(link) = &rendered.share_link {
        eprintln!("Share link: {}", link);
        eprintln!("WhatsApp:   {}", whatsapp_share_url(link));
    }
    Ok(())
}

/// Classify one value, returning the result and the strategy used
pub fn classify_value(args: &ClassifyArgs, settings: &Settings) -> (Classification, ClassificationStrategy) {
    let strategy = args.strategy.map(Into::into).unwrap_or(settings.strategy);
    let classification = lab_desk_domain::services::classify_with(&args.value, &args.range, strategy.policy());
    (classification, strategy)
}

/// `labdesk classify`
pub fn run_classify(args: &ClassifyArgs, settings: &Settings) -> Result<()> {
    let (classification, strategy) = classify_value(args, settings);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Value", "Range", "Strategy", "Status", "Arrow", "Abnormal", "Color"]);
    table.add_row(vec![
        args.value.clone(),
        args.range.clone(),
        strategy.to_string(),
        classification.label.clone(),
        classification.arrow.glyph().to_string(),
        if classification.is_abnormal { "yes" } else { "no" }.to_string(),
        classification.severity().color().to_string(),
    ]);
    println!("{table}");
    Ok(())
}

/// Patient codes held by a report file
pub fn list_patient_codes(path: &Path) -> Result<Vec<String>> {
    let source = JsonFileReportSource::open(path)
        .with_context(|| format!("Failed to open report file {}", path.display()))?;
    Ok(source.patient_codes()?)
}

/// `labdesk patients`
pub fn run_patients(args: &PatientsArgs) -> Result<()> {
    let codes = list_patient_codes(&args.input)?;
    if codes.is_empty() {
        eprintln!("No patients in {}", args.input.display());
    }
    let mut stdout = io::stdout().lock();
    for code in codes {
        writeln!(stdout, "{}", code)?;
    }
    Ok(())
}
