//! Log record structure

use super::format::{custom_format, format_message};
use super::level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// One structured log record. Immutable once formatted.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Optional tag identifying the originating function or event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub payload: Map<String, Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            message: message.into(),
            event_type: None,
            payload: Map::new(),
        }
    }

    #[must_use]
    pub fn with_event_type(mut self, event_type: Option<&str>) -> Self {
        self.event_type = event_type.map(String::from);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Option<Value>) -> Self {
        self.payload = Self::payload_map(payload);
        self
    }

    #[must_use]
    pub fn with_payload_map(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Coerce an arbitrary payload into a key/value map. Anything that is not
    /// a JSON object is treated as empty.
    pub fn payload_map(payload: Option<Value>) -> Map<String, Value> {
        match payload {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// The event-type-prefixed message line, before timestamp and payload
    /// rendering.
    pub fn headline(&self) -> String {
        let message = if self.message.is_empty() {
            None
        } else {
            Some(self.message.as_str())
        };
        custom_format(message, self.event_type.as_deref())
    }

    /// The full display line written to the sinks.
    pub fn formatted(&self) -> String {
        format_message(self.level, self.timestamp, &self.headline(), &self.payload)
    }
}
