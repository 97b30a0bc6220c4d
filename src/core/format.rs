//! Pure formatting functions
//!
//! These normalize heterogeneous inputs (plain strings, caught errors,
//! arbitrary metadata) into a single human- and machine-readable line. They
//! never fail: an unserializable payload renders as if it were empty.

use super::level::LogLevel;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// An error being reported through the facade: either a bare string or an
/// error caught from a fallible operation, with an optional stack of causes.
#[derive(Debug, Clone)]
pub enum ErrorReport {
    Text(String),
    Caught {
        summary: String,
        stack: Option<String>,
    },
}

impl ErrorReport {
    /// Build a report from a caught error, collecting its source chain as the
    /// stack segment.
    pub fn caught(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut frames = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            frames.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        ErrorReport::Caught {
            summary: err.to_string(),
            stack: if frames.is_empty() {
                None
            } else {
                Some(frames.join("\n"))
            },
        }
    }

    /// Build a caught report with an explicit stack trace.
    pub fn with_stack(summary: impl Into<String>, stack: impl Into<String>) -> Self {
        ErrorReport::Caught {
            summary: summary.into(),
            stack: Some(stack.into()),
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            ErrorReport::Text(s) => s,
            ErrorReport::Caught { summary, .. } => summary,
        }
    }

    pub fn stack(&self) -> Option<&str> {
        match self {
            ErrorReport::Text(_) => None,
            ErrorReport::Caught { stack, .. } => stack.as_deref(),
        }
    }
}

impl From<&str> for ErrorReport {
    fn from(s: &str) -> Self {
        ErrorReport::Text(s.to_string())
    }
}

impl From<String> for ErrorReport {
    fn from(s: String) -> Self {
        ErrorReport::Text(s)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Render one log line: `"{timestamp} {level}: {message}"`, followed by a
/// pretty-printed JSON block when the payload still carries keys after the
/// `timestamp`/`message`/`level` keys are stripped.
pub fn format_message(
    level: LogLevel,
    timestamp: DateTime<Utc>,
    message: &str,
    payload: &Map<String, Value>,
) -> String {
    let base = format!("{} {}: {}", timestamp.format(TIMESTAMP_FORMAT), level, message);

    let mut rest = payload.clone();
    rest.remove("timestamp");
    rest.remove("message");
    rest.remove("level");
    if rest.is_empty() {
        return base;
    }

    match serde_json::to_string_pretty(&Value::Object(rest)) {
        Ok(json) => format!("{base}\n{json}"),
        // Unserializable payloads fail open, not closed.
        Err(_) => base,
    }
}

/// Render an error report for the sinks.
///
/// Plain strings take the short path `"{error}."`; caught errors carry the
/// contextual message and whatever stack is available (possibly none).
pub fn format_error(report: &ErrorReport, message: &str) -> String {
    match report {
        ErrorReport::Text(s) => format!("{s}."),
        ErrorReport::Caught { summary, stack } => format!(
            "[ERROR] {message} {summary}. Stack:\n{}",
            stack.as_deref().unwrap_or_default()
        ),
    }
}

/// Combine an optional message with an optional event-type tag.
pub fn custom_format(message: Option<&str>, event_type: Option<&str>) -> String {
    match (message, event_type) {
        (Some(m), Some(e)) => format!("{e}: {m}"),
        (Some(m), None) => m.to_string(),
        (None, Some(e)) => e.to_string(),
        (None, None) => String::new(),
    }
}
