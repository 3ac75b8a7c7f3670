use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// Filter used when neither `RUST_LOG` nor `--log-level` is given
pub const DEFAULT_FILTER: &str = "info";

/// Logging options gathered from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Explicit filter directive, overriding `RUST_LOG`
    pub filter: Option<String>,

    /// Emit ANSI colors
    pub with_ansi: bool,
}

/// Build the filter: explicit directive, then `RUST_LOG`, then the default
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    match &config.filter {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| {
            eprintln!("Warning: invalid log filter {:?}, using {:?}.", directive, DEFAULT_FILTER);
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Install the global subscriber. Logs go to stderr so report output on
/// stdout stays clean.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(config.with_ansi)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .with(build_filter(config))
        .try_init()
}
