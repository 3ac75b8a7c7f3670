//! Command line argument definitions for `labdesk`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use lab_desk_domain::services::{ClassificationStrategy, GroupingLayout};

use crate::export::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "labdesk",
    version,
    about = "Laboratory report generation",
    long_about = "Classify lab results against their reference ranges and render\n\
                  patient reports from exported report payloads."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter directive (overrides RUST_LOG), e.g. "debug" or "lab_desk_domain=trace".
    #[arg(long = "log-level", value_name = "FILTER", global = true)]
    pub log_level: Option<String>,

    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the report for one patient.
    Render(RenderArgs),

    /// Classify a single value against a reference range.
    Classify(ClassifyArgs),

    /// List the patient codes a report file holds.
    Patients(PatientsArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Report payload JSON (one payload or an array of payloads).
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Patient code to render.
    #[arg(long, value_name = "CODE")]
    pub patient: String,

    /// Lab profile JSON (default: $LABDESK_LAB_PROFILE).
    #[arg(long = "lab-profile", value_name = "FILE")]
    pub lab_profile: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Section layout (default: $LABDESK_LAYOUT or nested).
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Classification strategy (default: $LABDESK_STRATEGY or standard).
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Base URL of the public report page (default: $LABDESK_PUBLIC_BASE_URL).
    #[arg(long = "public-base-url", value_name = "URL")]
    pub public_base_url: Option<String>,

    /// Leave the share link off the report.
    #[arg(long = "no-share-link")]
    pub no_share_link: bool,

    /// Write the report to a file instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Measured value, e.g. "12.5" or "Negative".
    #[arg(long, allow_hyphen_values = true)]
    pub value: String,

    /// Reference range, e.g. "70-110", "<5" or "Negative".
    #[arg(long, allow_hyphen_values = true)]
    pub range: String,

    /// Classification strategy.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

#[derive(Debug, Args)]
pub struct PatientsArgs {
    /// Report payload JSON.
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Nested,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Standard,
    PublicView,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

impl From<LayoutArg> for GroupingLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Nested => GroupingLayout::Nested,
            LayoutArg::Flat => GroupingLayout::Flat,
        }
    }
}

impl From<StrategyArg> for ClassificationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Standard => ClassificationStrategy::Standard,
            StrategyArg::PublicView => ClassificationStrategy::PublicView,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from([
            "labdesk",
            "render",
            "--input",
            "reports.json",
            "--patient",
            "LAB-1001",
            "--format",
            "json",
            "--strategy",
            "public-view",
            "--layout",
            "flat",
        ]);

        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.patient, "LAB-1001");
        assert_eq!(args.format, FormatArg::Json);
        assert_eq!(args.strategy.map(ClassificationStrategy::from), Some(ClassificationStrategy::PublicView));
        assert_eq!(args.layout.map(GroupingLayout::from), Some(GroupingLayout::Flat));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_parse_classify_with_negative_looking_range() {
        let cli = Cli::parse_from(["labdesk", "--log-level", "debug", "classify", "--value", "-1", "--range", "<5"]);

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.value, "-1");
        assert_eq!(args.range, "<5");
        assert!(args.strategy.is_none());
    }
}
