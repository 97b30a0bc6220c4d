//! Console sink

use crate::core::{LogLevel, LogRecord, Result, Sink};
use colored::Colorize;

/// Colorized, human-readable console output for local and test environments.
pub struct ConsoleSink {
    min_level: LogLevel,
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            use_colors: true,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn render(&self, record: &LogRecord) -> String {
        let line = record.formatted();
        if self.use_colors {
            line.color(record.level.color_code()).to_string()
        } else {
            line
        }
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        if !record.level.is_enabled_at(self.min_level) {
            return Ok(());
        }

        let output = self.render(record);

        // Errors and warnings go to stderr, the rest to stdout.
        match record.level {
            LogLevel::Error | LogLevel::Warn => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
