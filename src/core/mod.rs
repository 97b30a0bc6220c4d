//! Core facade types and decision functions

pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod record;
pub mod sampling;
pub mod sink;
pub mod tracking;
pub mod transport;
pub mod webhook;

pub use error::{LoggerError, Result};
pub use format::{custom_format, format_error, format_message, ErrorReport};
pub use level::LogLevel;
pub use logger::Logger;
pub use record::LogRecord;
pub use sampling::{SamplingOptions, TraceSampler, HEALTH_CHECK_PATH};
pub use sink::Sink;
pub use tracking::ErrorTrackingHandlers;
pub use transport::{
    select_transports, stream_name, TransportConfig, TransportPlan, ENVIRONMENT_VAR,
    LOCAL_ENVIRONMENTS,
};
pub use webhook::{WebhookConfig, WebhookMessage};
