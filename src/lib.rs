//! Internet Speed Meter
//!
//! A command-line internet speed meter that estimates download and upload
//! throughput plus latency by issuing timed HTTP requests against a
//! speed-test server, reporting per-cycle samples live and headline
//! averages at the end of each session.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod session;
pub mod stats;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, HeadlineMetrics, MetricField, Sample, SessionReport};
pub use probe::{HttpTransferProbe, ProbeResult, TransferProbe};
pub use session::{ProgressSink, SpeedTestSession};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// Base URL of the speed-test server
    pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

    /// Standard profile: one cycle every 100 ms over a 3 s session
    pub const DEFAULT_CADENCE_MS: u64 = 100;
    pub const DEFAULT_TOTAL_DURATION_MS: u64 = 3_000;

    /// Extended profile: one cycle every second over a 5 s session
    pub const EXTENDED_CADENCE_MS: u64 = 1_000;
    pub const EXTENDED_TOTAL_DURATION_MS: u64 = 5_000;

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Fixed upload payload size (1 MiB), matching the server contract
    pub const UPLOAD_PAYLOAD_BYTES: usize = 1_048_576;

    /// Collaborator endpoint paths
    pub const DOWNLOAD_PATH: &str = "/api/download";
    pub const UPLOAD_PATH: &str = "/api/upload";
    pub const PING_PATH: &str = "/api/ping";
}
