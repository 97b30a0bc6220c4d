//! Log-aggregation service sink
//!
//! Posts one JSON record per write to the token-addressed ingestion endpoint
//! of the hosted aggregation service.

use crate::core::{LogLevel, LogRecord, LoggerError, Result, Sink};
use std::time::Duration;

const INGEST_BASE_URL: &str = "https://logs-01.loggly.com/inputs";
const POST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct AggregationSink {
    endpoint: String,
    tag: String,
    min_level: LogLevel,
    client: reqwest::blocking::Client,
}

impl AggregationSink {
    pub fn new(token: &str, tag: &str, min_level: LogLevel) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(POST_TIMEOUT)
            .build()
            .map_err(|e| LoggerError::config("aggregation", e.to_string()))?;

        Ok(Self {
            endpoint: format!("{INGEST_BASE_URL}/{token}/tag/{tag}/"),
            tag: tag.to_string(),
            min_level,
            client,
        })
    }

    #[cfg(test)]
    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Sink for AggregationSink {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        if !record.level.is_enabled_at(self.min_level) {
            return Ok(());
        }

        let body = serde_json::json!({
            "timestamp": record.timestamp.to_rfc3339(),
            "level": record.level.as_str(),
            "message": record.formatted(),
            "tag": self.tag,
        });

        self.client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| LoggerError::delivery("aggregation", e.to_string()))?
            .error_for_status()
            .map_err(|e| LoggerError::delivery("aggregation", e.to_string()))?;

        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn name(&self) -> &'static str {
        "aggregation"
    }
}
