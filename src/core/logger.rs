//! The logger facade
//!
//! A `Logger` starts uninitialized: every leveled call and `set_level` fails
//! until [`Logger::init_transports`] has configured the sinks. Errors fan out
//! to three independent destinations (sinks, webhook alert, error tracker);
//! no destination's failure may prevent the others.

use parking_lot::RwLock;
use serde_json::Value;
use std::thread;

use super::error::{LoggerError, Result};
use super::format::{self, ErrorReport};
use super::level::LogLevel;
use super::record::LogRecord;
use super::sampling::SamplingOptions;
use super::sink::Sink;
use super::tracking::{self, ErrorTrackingHandlers};
use super::transport::{self, TransportConfig, TransportPlan};
use super::webhook::{self, WebhookConfig};
use crate::sinks::{AggregationSink, CloudSink, ConsoleSink, HttpLogStreamClient};

pub struct Logger {
    min_level: LogLevel,
    sinks: RwLock<Vec<Box<dyn Sink>>>,
    initialized: bool,
    tag: String,
    environment: String,
    webhook: Option<WebhookConfig>,
}

impl Logger {
    /// A new, uninitialized logger with default level `debug`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Debug,
            sinks: RwLock::new(Vec::new()),
            initialized: false,
            tag: String::new(),
            environment: String::new(),
            webhook: None,
        }
    }

    /// Configure the active sinks from the deployment environment and the
    /// given options. Calling this again replaces the previous sink set.
    pub fn init_transports(&mut self, config: TransportConfig) -> Result<()> {
        self.init_transports_in(config, transport::current_environment())
    }

    fn init_transports_in(&mut self, config: TransportConfig, environment: String) -> Result<()> {
        let (level, tag) = config.validate()?;

        let plan = transport::select_transports(
            &environment,
            config.force_console,
            config.aggregation_token.is_some(),
        );

        let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
        match plan {
            TransportPlan::ConsoleOnly => {
                sinks.push(Box::new(ConsoleSink::new(level)));
            }
            TransportPlan::Cloud { aggregation } => {
                let client = HttpLogStreamClient::new(&config.region)?;
                sinks.push(Box::new(CloudSink::new(
                    Box::new(client),
                    &tag,
                    &environment,
                    level,
                )));

                if aggregation {
                    if let Some(token) = config.aggregation_token.as_deref() {
                        let namespace = transport::namespace(&tag, &environment);
                        sinks.push(Box::new(AggregationSink::new(token, &namespace, level)?));
                    }
                }
            }
        }

        *self.sinks.write() = sinks;
        self.min_level = level;
        self.tag = tag;
        self.environment = environment;
        self.webhook = config.webhook_url.map(|url| WebhookConfig {
            url,
            color: config.webhook_color,
        });
        self.initialized = true;
        Ok(())
    }

    /// Bind the process-wide error tracker. Only the first call takes effect.
    pub fn init_error_tracking(
        &self,
        dsn: &str,
        ignore_errors: Vec<String>,
        traces_sample_rate: f64,
        sampling: SamplingOptions,
    ) -> Result<()> {
        tracking::init(dsn, ignore_errors, traces_sample_rate, sampling)
    }

    /// Handlers for request-level instrumentation. Fails when error tracking
    /// was never initialized.
    pub fn error_tracking_handlers(&self) -> Result<ErrorTrackingHandlers> {
        tracking::handlers()
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    /// Change the minimum severity, propagating it to every active sink.
    pub fn set_level(&mut self, level: LogLevel) -> Result<()> {
        self.ensure_initialized()?;

        self.min_level = level;
        for sink in self.sinks.write().iter_mut() {
            sink.set_min_level(level);
        }
        Ok(())
    }

    pub fn debug(
        &self,
        message: &str,
        event_type: Option<&str>,
        payload: Option<Value>,
    ) -> Result<()> {
        self.log(LogLevel::Debug, message, event_type, payload)
    }

    pub fn info(
        &self,
        message: &str,
        event_type: Option<&str>,
        payload: Option<Value>,
    ) -> Result<()> {
        self.log(LogLevel::Info, message, event_type, payload)
    }

    pub fn warn(
        &self,
        message: &str,
        event_type: Option<&str>,
        payload: Option<Value>,
    ) -> Result<()> {
        self.log(LogLevel::Warn, message, event_type, payload)
    }

    /// Report an error: write it to the sinks, post a webhook alert when one
    /// is configured (fire-and-forget), and capture it to the error tracker
    /// when tracking is initialized. The three effects are independent.
    pub fn error(
        &self,
        report: impl Into<ErrorReport>,
        message: &str,
        event_type: Option<&str>,
        payload: Option<Value>,
    ) -> Result<()> {
        self.ensure_initialized()?;

        let report = report.into();
        let payload = LogRecord::payload_map(payload);

        let record = LogRecord::new(LogLevel::Error, format::format_error(&report, message))
            .with_event_type(event_type)
            .with_payload_map(payload.clone());
        self.dispatch(&record);

        if let Some(config) = self.webhook.clone() {
            let alert = webhook::build_alert(
                &report,
                Some(message),
                event_type,
                &payload,
                &self.environment,
                &config.color,
            );
            // Fire-and-forget; webhook::post contains every failure.
            thread::spawn(move || webhook::post(&config.url, &alert));
        }

        tracking::capture(&report, message, &payload);

        Ok(())
    }

    /// Post a webhook alert and wait for the outcome, which is discarded.
    /// The explicit `override_url` takes precedence over the instance
    /// default; with neither, no network call is made. This path never fails.
    pub fn post_webhook_alert(
        &self,
        report: &ErrorReport,
        message: Option<&str>,
        event_type: Option<&str>,
        payload: Option<Value>,
        override_url: Option<&str>,
    ) {
        let url = match override_url.or(self.webhook.as_ref().map(|w| w.url.as_str())) {
            Some(url) => url.to_string(),
            None => return,
        };

        let color = self
            .webhook
            .as_ref()
            .map(|w| w.color.as_str())
            .unwrap_or(transport::DEFAULT_WEBHOOK_COLOR);

        let alert = webhook::build_alert(
            report,
            message,
            event_type,
            &LogRecord::payload_map(payload),
            &self.environment,
            color,
        );
        webhook::post(&url, &alert);
    }

    /// Names of the active sinks, in dispatch order.
    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.read().iter().map(|sink| sink.name()).collect()
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Flush every sink. Like [`dispatch`](Self::dispatch), one failing or
    /// panicking sink never stops the remaining sinks from flushing.
    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.sinks.write();
        for (idx, sink) in sinks.iter_mut().enumerate() {
            let outcome =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink #{} flush failed: {}", idx, e);
                }
                Err(_) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} panicked during flush. \
                         Other sinks continue to function.",
                        idx
                    );
                }
            }
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(LoggerError::Uninitialized)
        }
    }

    fn log(
        &self,
        level: LogLevel,
        message: &str,
        event_type: Option<&str>,
        payload: Option<Value>,
    ) -> Result<()> {
        self.ensure_initialized()?;

        if !level.is_enabled_at(self.min_level) {
            return Ok(());
        }

        let record = LogRecord::new(level, message)
            .with_event_type(event_type)
            .with_payload(payload);
        self.dispatch(&record);
        Ok(())
    }

    /// Write a record to every sink with per-sink failure isolation: one
    /// failing or panicking sink never stops the others.
    fn dispatch(&self, record: &LogRecord) {
        let mut sinks = self.sinks.write();
        for (idx, sink) in sinks.iter_mut().enumerate() {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.write(record)
            }));

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink #{} failed: {}", idx, e);
                }
                Err(_) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} panicked. Other sinks continue to function.",
                        idx
                    );
                }
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    fn console_config() -> TransportConfig {
        TransportConfig::new()
            .with_default_level(LogLevel::Debug)
            .with_tag("lounge")
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        written: Arc<Mutex<Vec<String>>>,
        flushes: Arc<Mutex<u32>>,
    }

    impl Sink for RecordingSink {
        fn write(&mut self, record: &LogRecord) -> Result<()> {
            self.written.lock().push(record.formatted());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            *self.flushes.lock() += 1;
            Ok(())
        }

        fn set_min_level(&mut self, _level: LogLevel) {}

        fn min_level(&self) -> LogLevel {
            LogLevel::Debug
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&mut self, _record: &LogRecord) -> Result<()> {
            Err(LoggerError::delivery("failing", "connection refused"))
        }

        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::delivery("failing", "connection refused"))
        }

        fn set_min_level(&mut self, _level: LogLevel) {}

        fn min_level(&self) -> LogLevel {
            LogLevel::Debug
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn write(&mut self, _record: &LogRecord) -> Result<()> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> Result<()> {
            panic!("sink exploded");
        }

        fn set_min_level(&mut self, _level: LogLevel) {}

        fn min_level(&self) -> LogLevel {
            LogLevel::Debug
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[test]
    fn test_uninitialized_operations_fail() {
        let mut logger = Logger::new();
        assert!(matches!(
            logger.debug("m", None, None),
            Err(LoggerError::Uninitialized)
        ));
        assert!(matches!(
            logger.info("m", None, None),
            Err(LoggerError::Uninitialized)
        ));
        assert!(matches!(
            logger.warn("m", None, None),
            Err(LoggerError::Uninitialized)
        ));
        assert!(matches!(
            logger.error("boom", "m", None, None),
            Err(LoggerError::Uninitialized)
        ));
        assert!(matches!(
            logger.set_level(LogLevel::Info),
            Err(LoggerError::Uninitialized)
        ));
    }

    #[test]
    fn test_default_level_is_debug() {
        assert_eq!(Logger::new().level(), LogLevel::Debug);
    }

    #[test]
    fn test_localhost_is_console_only_despite_cloud_config() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(
                console_config()
                    .with_region("eu-west-1")
                    .with_aggregation_token("tok"),
                "localhost".to_string(),
            )
            .unwrap();
        assert_eq!(logger.sink_names(), vec!["console"]);
    }

    #[test]
    fn test_test_environment_is_console_only() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "test".to_string())
            .unwrap();
        assert_eq!(logger.sink_names(), vec!["console"]);
    }

    #[test]
    fn test_force_console_in_production() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(
                console_config().with_force_console(true),
                "production".to_string(),
            )
            .unwrap();
        assert_eq!(logger.sink_names(), vec!["console"]);
    }

    #[test]
    fn test_production_activates_cloud() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "production".to_string())
            .unwrap();
        assert_eq!(logger.sink_names(), vec!["cloud"]);
    }

    #[test]
    fn test_aggregation_requires_token() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(
                console_config().with_aggregation_token("tok"),
                "production".to_string(),
            )
            .unwrap();
        assert_eq!(logger.sink_names(), vec!["cloud", "aggregation"]);
    }

    #[test]
    fn test_reinitialization_replaces_sinks() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "localhost".to_string())
            .unwrap();
        assert_eq!(logger.sink_names(), vec!["console"]);

        logger
            .init_transports_in(
                console_config().with_aggregation_token("tok"),
                "production".to_string(),
            )
            .unwrap();
        // Exactly the second plan's sinks: nothing appended or retained.
        assert_eq!(logger.sink_names(), vec!["cloud", "aggregation"]);
    }

    #[test]
    fn test_missing_mandatory_options() {
        let mut logger = Logger::new();

        let err = logger
            .init_transports_in(
                TransportConfig::new().with_tag("lounge"),
                "localhost".to_string(),
            )
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(!logger.is_initialized());

        let err = logger
            .init_transports_in(
                TransportConfig::new().with_default_level(LogLevel::Info),
                "localhost".to_string(),
            )
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(!logger.is_initialized());
    }

    #[test]
    fn test_set_level_propagates_to_sinks() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(
                console_config().with_aggregation_token("tok"),
                "production".to_string(),
            )
            .unwrap();

        logger.set_level(LogLevel::Warn).unwrap();
        assert_eq!(logger.level(), LogLevel::Warn);
        for sink in logger.sinks.read().iter() {
            assert_eq!(sink.min_level(), LogLevel::Warn);
        }
    }

    #[test]
    fn test_logging_to_console() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "localhost".to_string())
            .unwrap();

        logger.info("started", Some("boot"), None).unwrap();
        logger
            .warn("slow", None, Some(json!({ "elapsed_ms": 900 })))
            .unwrap();
        logger.error("boom", "request failed", None, None).unwrap();
    }

    #[test]
    fn test_below_level_records_are_skipped() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(
                console_config().with_default_level(LogLevel::Error),
                "localhost".to_string(),
            )
            .unwrap();

        assert!(logger.debug("quiet", None, None).is_ok());
        assert!(logger.info("quiet", None, None).is_ok());
    }

    #[test]
    fn test_webhook_alert_without_url_is_noop() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "localhost".to_string())
            .unwrap();

        logger.post_webhook_alert(&"boom".into(), Some("m"), None, None, None);
    }

    #[test]
    fn test_failing_sink_does_not_block_later_sinks() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "localhost".to_string())
            .unwrap();

        let recording = RecordingSink::default();
        let written = Arc::clone(&recording.written);
        *logger.sinks.write() = vec![Box::new(FailingSink), Box::new(recording)];

        logger.info("still delivered", None, None).unwrap();

        let lines = written.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("info: still delivered"));
    }

    #[test]
    fn test_panicking_sink_does_not_block_later_sinks() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "localhost".to_string())
            .unwrap();

        let recording = RecordingSink::default();
        let written = Arc::clone(&recording.written);
        *logger.sinks.write() = vec![Box::new(PanickingSink), Box::new(recording)];

        logger.warn("still delivered", None, None).unwrap();
        assert_eq!(written.lock().len(), 1);
    }

    #[test]
    fn test_error_effects_are_independent() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(
                // An unroutable webhook address: the spawned post fails.
                console_config().with_webhook_url("http://127.0.0.1:9/alerts"),
                "localhost".to_string(),
            )
            .unwrap();

        let recording = RecordingSink::default();
        let written = Arc::clone(&recording.written);
        *logger.sinks.write() = vec![Box::new(FailingSink), Box::new(recording)];

        // A dead sink and a dead webhook together: the record still reaches
        // the healthy sink and the call still succeeds.
        logger
            .error("boom", "request failed", None, Some(json!({ "id": 7 })))
            .unwrap();

        let lines = written.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("error: boom."));
    }

    #[test]
    fn test_flush_reaches_every_sink() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "localhost".to_string())
            .unwrap();

        let recording = RecordingSink::default();
        let flushes = Arc::clone(&recording.flushes);
        *logger.sinks.write() = vec![
            Box::new(FailingSink),
            Box::new(PanickingSink),
            Box::new(recording),
        ];

        logger.flush().unwrap();
        assert_eq!(*flushes.lock(), 1);
    }

    #[test]
    fn test_tag_and_environment_exposed() {
        let mut logger = Logger::new();
        logger
            .init_transports_in(console_config(), "production".to_string())
            .unwrap();
        assert_eq!(logger.tag(), "lounge");
        assert_eq!(logger.environment(), "production");
    }
}
