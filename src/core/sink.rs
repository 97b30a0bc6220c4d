//! Sink trait for log output destinations

use super::{error::Result, level::LogLevel, record::LogRecord};

pub trait Sink: Send + Sync {
    /// Write one record. Implementations drop records below their own
    /// minimum level and report delivery failures as errors.
    fn write(&mut self, record: &LogRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn set_min_level(&mut self, level: LogLevel);

    fn min_level(&self) -> LogLevel;

    fn name(&self) -> &'static str;
}
