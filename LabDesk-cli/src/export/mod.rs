mod json;
mod text;

pub use json::JsonExporter;
pub use text::TextExporter;

use lab_desk_domain::export::ReportExporter;

/// Output formats the CLI can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Text,
}

/// Exporter for a format. `styled` only affects text output.
pub fn exporter_for(format: OutputFormat, styled: bool) -> Box<dyn ReportExporter> {
    match format {
        OutputFormat::Json => Box::new(JsonExporter::pretty()),
        OutputFormat::Text => Box::new(TextExporter {
            styled,
            ..TextExporter::default()
        }),
    }
}
