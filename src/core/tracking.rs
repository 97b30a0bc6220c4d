//! Error-tracker binding
//!
//! One binding per process, first-write-wins: the first initialization
//! installs the Sentry client with the trace sampler as its tracing decision
//! callback, and every later initialization is a no-op.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::error::{LoggerError, Result};
use super::format::{format_error, ErrorReport};
use super::sampling::{SamplingOptions, TraceSampler};
use super::transport;
use serde_json::{Map, Value};

static TRACKER: OnceCell<Tracker> = OnceCell::new();

struct Tracker {
    sampler: Arc<TraceSampler>,
}

/// Request-instrumentation handles bound to the first initialization's
/// configuration.
#[derive(Clone)]
pub struct ErrorTrackingHandlers {
    sampler: Arc<TraceSampler>,
}

impl ErrorTrackingHandlers {
    /// Sampling rate the tracer applies to this request.
    pub fn trace_rate(&self, url: &str, method: &str) -> f64 {
        self.sampler.rate_for(url, method)
    }

    /// Sampling decision for callers instrumenting requests manually.
    pub fn should_trace(&self, url: &str, method: &str) -> bool {
        self.sampler.should_sample(url, method)
    }

    /// Capture a request-level error message.
    pub fn capture_message(&self, message: &str) {
        sentry::capture_message(message, sentry::Level::Error);
    }
}

pub(crate) fn init(
    dsn: &str,
    ignore_errors: Vec<String>,
    traces_sample_rate: f64,
    options: SamplingOptions,
) -> Result<()> {
    TRACKER.get_or_init(|| {
        let sampler = Arc::new(TraceSampler::new(traces_sample_rate, options));
        let traces_sampler = Arc::clone(&sampler);

        let guard = sentry::init(sentry::ClientOptions {
            dsn: dsn.parse().ok(),
            environment: Some(transport::current_environment().into()),
            traces_sampler: Some(Arc::new(move |ctx| {
                traces_sampler.rate_for_transaction(ctx.name()) as f32
            })),
            before_send: Some(Arc::new(move |event| {
                if ignore_errors.is_empty() {
                    return Some(event);
                }

                let text = event
                    .message
                    .clone()
                    .or_else(|| {
                        event
                            .exception
                            .values
                            .first()
                            .and_then(|exc| exc.value.clone())
                    })
                    .unwrap_or_default();

                if ignore_errors.iter().any(|pattern| text.contains(pattern.as_str())) {
                    None
                } else {
                    Some(event)
                }
            })),
            ..Default::default()
        });

        // The client lives for the rest of the process; the SDK flushes it on
        // exit.
        std::mem::forget(guard);

        Tracker { sampler }
    });

    Ok(())
}

pub(crate) fn handlers() -> Result<ErrorTrackingHandlers> {
    TRACKER
        .get()
        .map(|tracker| ErrorTrackingHandlers {
            sampler: Arc::clone(&tracker.sampler),
        })
        .ok_or(LoggerError::Uninitialized)
}

/// Capture an error report with the payload attached as extra context.
/// No-op when tracking was never initialized.
pub(crate) fn capture(report: &ErrorReport, message: &str, payload: &Map<String, Value>) {
    if TRACKER.get().is_none() {
        return;
    }

    sentry::with_scope(
        |scope| {
            for (key, value) in payload {
                scope.set_extra(key, value.clone());
            }
        },
        || sentry::capture_message(&format_error(report, message), sentry::Level::Error),
    );
}
