//! Data models for configuration, samples, and session reports

pub mod config;
pub mod report;

pub use config::Config;
pub use report::{HeadlineMetrics, MetricField, Sample, SessionReport};
