//! Sink implementations

pub mod aggregation;
pub mod cloud;
pub mod console;

pub use aggregation::AggregationSink;
pub use cloud::{CloudSink, HttpLogStreamClient, LogStreamClient};
pub use console::ConsoleSink;

pub use crate::core::Sink;
