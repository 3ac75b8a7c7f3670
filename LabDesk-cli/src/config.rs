use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use lab_desk_domain::services::{ClassificationStrategy, GroupingLayout};

/// Base URL of the public report page when nothing is configured
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:5173";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid public base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Public base URL must be http or https, got {0}")]
    UnsupportedScheme(String),
}

/// Settings drawn from the environment, before command line overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Where the public report page is served
    pub public_base_url: Url,

    /// Lab profile JSON used when `--lab-profile` is not given
    pub lab_profile: Option<PathBuf>,

    pub strategy: ClassificationStrategy,

    pub layout: GroupingLayout,
}

impl Settings {
    /// Read `LABDESK_*` variables, falling back to defaults for anything
    /// missing or unreadable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("LABDESK_PUBLIC_BASE_URL").unwrap_or_else(|_| {
            debug!("LABDESK_PUBLIC_BASE_URL not set - using localhost default.");
            DEFAULT_PUBLIC_BASE_URL.to_string()
        });

        let lab_profile = std::env::var("LABDESK_LAB_PROFILE")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let strategy = std::env::var("LABDESK_STRATEGY")
            .ok()
            .and_then(|value| match value.parse::<ClassificationStrategy>() {
                Ok(strategy) => Some(strategy),
                Err(message) => {
                    warn!("{} - using the standard strategy.", message);
                    None
                }
            })
            .unwrap_or_default();

        let layout = std::env::var("LABDESK_LAYOUT")
            .ok()
            .and_then(|value| match value.trim().to_ascii_lowercase().as_str() {
                "nested" => Some(GroupingLayout::Nested),
                "flat" => Some(GroupingLayout::Flat),
                other => {
                    warn!("Unknown LABDESK_LAYOUT {:?} - using nested.", other);
                    None
                }
            })
            .unwrap_or_default();

        Ok(Self {
            public_base_url: parse_base_url(&base_url)?,
            lab_profile,
            strategy,
            layout,
        })
    }
}

/// Parse a public base URL, accepting only http(s)
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
