//! Transport selection policy
//!
//! Decides, from the deployment environment and the initialization options,
//! which sinks a logger activates. Local and test environments (and the
//! explicit force flag) get a console sink only; everything else ships to
//! cloud log storage, plus the aggregation service when a token is supplied.

use super::error::{LoggerError, Result};
use super::level::LogLevel;
use chrono::NaiveDate;

/// Process-wide variable naming the deployment environment, read at
/// transport-initialization time.
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// Environments that log to the console only.
pub const LOCAL_ENVIRONMENTS: [&str; 2] = ["localhost", "test"];

pub(crate) const DEFAULT_WEBHOOK_COLOR: &str = "#b52626";
const DEFAULT_REGION: &str = "us-east-1";

/// Options for [`Logger::init_transports`](crate::Logger::init_transports),
/// every one enumerated and defaulted.
///
/// `default_level` and `tag` are mandatory; initialization fails with a
/// descriptive configuration error when either is missing.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub default_level: Option<LogLevel>,
    /// Label used to namespace sink identifiers (log group and stream names).
    pub tag: Option<String>,
    pub force_console: bool,
    pub webhook_url: Option<String>,
    /// Hex color for webhook alert attachments.
    pub webhook_color: String,
    /// Target region for the cloud log-storage sink.
    pub region: String,
    /// Aggregation-service token; the aggregation sink is only activated when
    /// this is present.
    pub aggregation_token: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            default_level: None,
            tag: None,
            force_console: false,
            webhook_url: None,
            webhook_color: DEFAULT_WEBHOOK_COLOR.to_string(),
            region: DEFAULT_REGION.to_string(),
            aggregation_token: None,
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_level(mut self, level: LogLevel) -> Self {
        self.default_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_force_console(mut self, force: bool) -> Self {
        self.force_console = force;
        self
    }

    #[must_use]
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_webhook_color(mut self, color: impl Into<String>) -> Self {
        self.webhook_color = color.into();
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    #[must_use]
    pub fn with_aggregation_token(mut self, token: impl Into<String>) -> Self {
        self.aggregation_token = Some(token.into());
        self
    }

    /// Check the mandatory options, returning `(default_level, tag)`.
    pub(crate) fn validate(&self) -> Result<(LogLevel, String)> {
        let level = self
            .default_level
            .ok_or_else(|| LoggerError::config("transports", "defaultLevel is required"))?;

        match self.tag.as_deref() {
            Some(tag) if !tag.trim().is_empty() => Ok((level, tag.to_string())),
            _ => Err(LoggerError::config(
                "transports",
                "tag is required and must be non-empty",
            )),
        }
    }
}

/// The set of sinks a logger activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportPlan {
    /// Colorized console output only.
    ConsoleOnly,
    /// Cloud log storage, plus the aggregation service when a token was
    /// supplied.
    Cloud { aggregation: bool },
}

/// Pick the transport plan for one initialization.
pub fn select_transports(
    environment: &str,
    force_console: bool,
    has_aggregation_token: bool,
) -> TransportPlan {
    if force_console || LOCAL_ENVIRONMENTS.contains(&environment) {
        TransportPlan::ConsoleOnly
    } else {
        TransportPlan::Cloud {
            aggregation: has_aggregation_token,
        }
    }
}

/// Read the deployment environment, defaulting to `localhost` when unset.
pub fn current_environment() -> String {
    std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "localhost".to_string())
}

/// Sink namespace: `"{tag}-{environment}"`.
pub fn namespace(tag: &str, environment: &str) -> String {
    format!("{tag}-{environment}")
}

/// Dated log-stream name: `"{tag}-{YYYY-MM-DD}"`. Callers recompute this for
/// every write so stream size stays bounded across long-running processes.
pub fn stream_name(tag: &str, date: NaiveDate) -> String {
    format!("{}-{}", tag, date.format("%Y-%m-%d"))
}
