//! # unilog
//!
//! A unified logging facade for backend services. Structured log records are
//! routed to one or more sinks — console, cloud log storage, a hosted
//! log-aggregation service — selected from the deployment environment, and
//! captured errors are optionally forwarded to an error-tracking service and
//! a chat-webhook alert channel.
//!
//! ## Usage
//!
//! ```no_run
//! use unilog::prelude::*;
//!
//! let mut logger = Logger::new();
//! logger.init_transports(
//!     TransportConfig::new()
//!         .with_default_level(LogLevel::Info)
//!         .with_tag("lounge")
//!         .with_webhook_url("https://hooks.example.com/T000/B000"),
//! )?;
//!
//! logger.info("server started", Some("boot"), None)?;
//! logger.error("connection refused", "db unreachable", None, None)?;
//! # Ok::<(), unilog::LoggerError>(())
//! ```

pub mod core;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        custom_format, format_error, format_message, ErrorReport, ErrorTrackingHandlers,
        LogLevel, LogRecord, Logger, LoggerError, Result, SamplingOptions, Sink, TraceSampler,
        TransportConfig, TransportPlan, WebhookConfig,
    };
    pub use crate::sinks::{
        AggregationSink, CloudSink, ConsoleSink, HttpLogStreamClient, LogStreamClient,
    };
}

pub use crate::core::{
    custom_format, format_error, format_message, select_transports, stream_name, ErrorReport,
    ErrorTrackingHandlers, LogLevel, LogRecord, Logger, LoggerError, Result, SamplingOptions,
    Sink, TraceSampler, TransportConfig, TransportPlan, WebhookConfig, WebhookMessage,
    ENVIRONMENT_VAR, HEALTH_CHECK_PATH, LOCAL_ENVIRONMENTS,
};
pub use crate::sinks::{AggregationSink, CloudSink, ConsoleSink, HttpLogStreamClient, LogStreamClient};
