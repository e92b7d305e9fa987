//! Sample and session report data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed measurement cycle, appended to the live series.
///
/// Immutable after creation; the live series is append-only for the
/// duration of a session and cleared when a new session begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sequence label for charting, e.g. "0s", "1s"
    pub label: String,

    /// Download throughput measured this cycle
    pub download_mbps: f64,

    /// Upload throughput measured this cycle
    pub upload_mbps: f64,
}

impl Sample {
    /// Create a sample for cycle `index`
    pub fn new(index: u64, download_mbps: f64, upload_mbps: f64) -> Self {
        Self {
            label: format!("{}s", index),
            download_mbps,
            upload_mbps,
        }
    }
}

/// Lifecycle of one user-facing summary value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum MetricField {
    /// No session has produced a value yet ("--")
    Placeholder,
    /// A session is measuring ("...")
    InProgress,
    /// Final formatted value with unit, e.g. "94.21 Mbps" or "23 ms"
    Value(String),
    /// The measurement failed ("Error")
    Failed,
}

impl MetricField {
    /// Text shown to the user for this field state
    pub fn display(&self) -> &str {
        match self {
            MetricField::Placeholder => "--",
            MetricField::InProgress => "...",
            MetricField::Value(text) => text,
            MetricField::Failed => "Error",
        }
    }

    /// Whether this field holds a final formatted value
    pub fn is_final(&self) -> bool {
        matches!(self, MetricField::Value(_) | MetricField::Failed)
    }
}

impl Default for MetricField {
    fn default() -> Self {
        MetricField::Placeholder
    }
}

/// The three user-facing summary values of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadlineMetrics {
    pub download: MetricField,
    pub upload: MetricField,
    pub ping: MetricField,
}

impl HeadlineMetrics {
    /// All three fields in the in-progress state, published at session start
    pub fn in_progress() -> Self {
        Self {
            download: MetricField::InProgress,
            upload: MetricField::InProgress,
            ping: MetricField::InProgress,
        }
    }
}

/// Final outcome of one measurement session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// When the session started
    pub started_at: DateTime<Utc>,

    /// When the session completed (cycles plus final ping)
    pub completed_at: DateTime<Utc>,

    /// Number of bandwidth cycles the session was configured to run
    pub cycle_count: u64,

    /// Cycles where both directions succeeded and a sample was emitted
    pub successful_cycles: u64,

    /// Successful download measurements (may exceed `successful_cycles`
    /// when upload failed in a cycle whose download succeeded)
    pub download_sample_count: u64,

    /// Successful upload measurements
    pub upload_sample_count: u64,

    /// Full-precision per-direction averages over each direction's own
    /// successful attempts, `0.0` when a direction collected no samples
    pub average_download_mbps: f64,
    pub average_upload_mbps: f64,

    /// Final latency, `None` when the ping probe failed
    pub ping_ms: Option<u64>,

    /// Headline fields as displayed to the user
    pub headline: HeadlineMetrics,

    /// The live series of per-cycle samples, in emission order
    pub samples: Vec<Sample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_label_format() {
        let sample = Sample::new(0, 10.0, 5.0);
        assert_eq!(sample.label, "0s");
        assert_eq!(Sample::new(12, 1.0, 1.0).label, "12s");
    }

    #[test]
    fn test_metric_field_display() {
        assert_eq!(MetricField::Placeholder.display(), "--");
        assert_eq!(MetricField::InProgress.display(), "...");
        assert_eq!(MetricField::Value("94.21 Mbps".into()).display(), "94.21 Mbps");
        assert_eq!(MetricField::Failed.display(), "Error");
    }

    #[test]
    fn test_metric_field_finality() {
        assert!(!MetricField::Placeholder.is_final());
        assert!(!MetricField::InProgress.is_final());
        assert!(MetricField::Value("23 ms".into()).is_final());
        assert!(MetricField::Failed.is_final());
    }

    #[test]
    fn test_headline_defaults_to_placeholders() {
        let headline = HeadlineMetrics::default();
        assert_eq!(headline.download.display(), "--");
        assert_eq!(headline.upload.display(), "--");
        assert_eq!(headline.ping.display(), "--");
    }

    #[test]
    fn test_sample_serialization() {
        let sample = Sample::new(1, 94.21, 23.11);
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"label\":\"1s\""));
        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
