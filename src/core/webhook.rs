//! Chat-webhook alert channel
//!
//! Builds the attachment-style message body and posts it. Alert delivery is
//! best-effort: every failure on this path is contained here and never
//! surfaced to the caller.

use super::format::{custom_format, ErrorReport};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

const POST_TIMEOUT: Duration = Duration::from_secs(5);

/// Webhook settings stored on the logger at transport initialization.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub pretext: String,
    pub color: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub title: String,
    pub short: bool,
    pub value: String,
}

/// Build the alert body: a title line, a details block, a pretty-printed
/// payload block, and a stack-trace block only when a stack exists.
pub fn build_alert(
    report: &ErrorReport,
    message: Option<&str>,
    event_type: Option<&str>,
    payload: &Map<String, Value>,
    environment: &str,
    color: &str,
) -> WebhookMessage {
    let headline = format!("{} {}", custom_format(message, event_type), report.summary())
        .trim()
        .to_string();

    let pretty_payload = serde_json::to_string_pretty(&Value::Object(payload.clone()))
        .unwrap_or_else(|_| "{}".to_string());

    let mut fields = vec![
        Field {
            title: "Details".to_string(),
            short: false,
            value: format!("Environment: {environment}\nError: {}", report.summary()),
        },
        Field {
            title: "Payload".to_string(),
            short: false,
            value: pretty_payload,
        },
    ];

    if let Some(stack) = report.stack() {
        fields.push(Field {
            title: "Stack trace".to_string(),
            short: false,
            value: stack.to_string(),
        });
    }

    WebhookMessage {
        attachments: vec![Attachment {
            fallback: headline.clone(),
            pretext: headline,
            color: color.to_string(),
            fields,
        }],
    }
}

/// Post an alert as a JSON body. Network and serialization failures are
/// swallowed; this function never fails.
pub fn post(url: &str, message: &WebhookMessage) {
    let client = match reqwest::blocking::Client::builder()
        .timeout(POST_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(_) => return,
    };

    let _ = client.post(url).json(message).send();
}
