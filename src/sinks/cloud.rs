//! Cloud log-storage sink
//!
//! Formats records and hands them to an external log-stream client. The
//! client owns delivery; this sink only decides the group and stream
//! addressing. Stream names carry the current UTC date so individual streams
//! stay bounded across long-running processes, recomputed on every write.

use crate::core::transport::{namespace, stream_name};
use crate::core::{LogLevel, LogRecord, LoggerError, Result, Sink};
use chrono::{DateTime, Utc};

/// External client accepting records addressed by log group and stream.
pub trait LogStreamClient: Send + Sync {
    fn put_record(
        &mut self,
        group: &str,
        stream: &str,
        timestamp: DateTime<Utc>,
        line: &str,
    ) -> Result<()>;
}

pub struct CloudSink {
    client: Box<dyn LogStreamClient>,
    group: String,
    tag: String,
    min_level: LogLevel,
}

impl CloudSink {
    pub fn new(
        client: Box<dyn LogStreamClient>,
        tag: &str,
        environment: &str,
        min_level: LogLevel,
    ) -> Self {
        Self {
            client,
            group: namespace(tag, environment),
            tag: tag.to_string(),
            min_level,
        }
    }

    /// The stream name for a write happening now. Never cached.
    fn current_stream(&self) -> String {
        stream_name(&self.tag, Utc::now().date_naive())
    }
}

impl Sink for CloudSink {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        if !record.level.is_enabled_at(self.min_level) {
            return Ok(());
        }

        let stream = self.current_stream();
        let line = record.formatted();
        self.client
            .put_record(&self.group, &stream, record.timestamp, &line)
    }

    fn flush(&mut self) -> Result<()> {
        // Buffering, if any, is owned by the external client.
        Ok(())
    }

    fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn name(&self) -> &'static str {
        "cloud"
    }
}

/// HTTP implementation of [`LogStreamClient`], addressed by region.
pub struct HttpLogStreamClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpLogStreamClient {
    pub fn new(region: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| LoggerError::config("cloud", e.to_string()))?;

        Ok(Self {
            endpoint: format!("https://logs.{region}.amazonaws.com/"),
            client,
        })
    }
}

impl LogStreamClient for HttpLogStreamClient {
    fn put_record(
        &mut self,
        group: &str,
        stream: &str,
        timestamp: DateTime<Utc>,
        line: &str,
    ) -> Result<()> {
        let body = serde_json::json!({
            "logGroupName": group,
            "logStreamName": stream,
            "logEvents": [{
                "timestamp": timestamp.timestamp_millis(),
                "message": line,
            }],
        });

        self.client
            .post(&self.endpoint)
            .header("x-amz-target", "Logs_20140328.PutLogEvents")
            .header(reqwest::header::CONTENT_TYPE, "application/x-amz-json-1.1")
            .json(&body)
            .send()
            .map_err(|e| LoggerError::delivery("cloud", e.to_string()))?
            .error_for_status()
            .map_err(|e| LoggerError::delivery("cloud", e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct RecordingClient {
        puts: Arc<Mutex<Vec<(String, String, String)>>>,
    }

    impl LogStreamClient for RecordingClient {
        fn put_record(
            &mut self,
            group: &str,
            stream: &str,
            _timestamp: DateTime<Utc>,
            line: &str,
        ) -> Result<()> {
            self.puts
                .lock()
                .push((group.to_string(), stream.to_string(), line.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_addressing() {
        let client = RecordingClient::default();
        let puts = Arc::clone(&client.puts);
        let mut sink = CloudSink::new(Box::new(client), "lounge", "production", LogLevel::Info);

        sink.write(&LogRecord::new(LogLevel::Info, "hello")).unwrap();

        let expected_stream = stream_name("lounge", Utc::now().date_naive());
        let recorded = puts.lock();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "lounge-production");
        assert_eq!(recorded[0].1, expected_stream);
        assert!(recorded[0].2.ends_with("info: hello"));
    }

    #[test]
    fn test_stream_recomputed_each_write() {
        let client = RecordingClient::default();
        let puts = Arc::clone(&client.puts);
        let mut sink = CloudSink::new(Box::new(client), "api", "staging", LogLevel::Debug);

        sink.write(&LogRecord::new(LogLevel::Info, "a")).unwrap();
        sink.write(&LogRecord::new(LogLevel::Info, "b")).unwrap();

        // Both writes resolve the stream from the clock, not a cached name.
        let recorded = puts.lock();
        assert_eq!(recorded.len(), 2);
        assert!(recorded[0].1.starts_with("api-"));
        assert_eq!(recorded[0].1.len(), "api-2024-05-01".len());
    }

    #[test]
    fn test_below_min_level_not_delivered() {
        let client = RecordingClient::default();
        let puts = Arc::clone(&client.puts);
        let mut sink = CloudSink::new(Box::new(client), "api", "staging", LogLevel::Warn);

        sink.write(&LogRecord::new(LogLevel::Debug, "noise")).unwrap();
        assert!(puts.lock().is_empty());
    }
}
