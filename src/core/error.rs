//! Error types for the logging facade

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Logging or level operation attempted before transports were configured
    #[error("logger used before transports were initialized")]
    Uninitialized,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Sink delivery failure
    #[error("Delivery error for sink '{sink}': {message}")]
    Delivery { sink: String, message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink delivery error
    pub fn delivery(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Delivery {
            sink: sink.into(),
            message: message.into(),
        }
    }
}
