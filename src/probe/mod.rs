//! Timed transfer probes: one HTTP round trip per measurement
//!
//! Each probe performs a single request/response pair bracketed by a
//! monotonic clock and reports elapsed time plus payload size. Failures
//! are returned to the caller without retry; the sampling loop decides
//! what a failed probe means for the session.

use crate::{
    defaults,
    error::{AppError, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Elapsed time and payload size of one transfer measurement.
///
/// Ephemeral: produced and consumed within a single cycle, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    /// Wall-clock time from request issuance to full completion
    pub elapsed: Duration,

    /// Transferred payload size in bits
    pub payload_bits: u64,
}

impl ProbeResult {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Transfer probe trait for abstraction and testing
#[async_trait]
pub trait TransferProbe: Send + Sync {
    /// Fetch and discard the download payload, timing the full receipt.
    /// Payload size is taken from the actual received byte count since the
    /// server's response size is not assumed fixed.
    async fn measure_download(&self) -> Result<ProbeResult>;

    /// Send a fixed 1 MiB payload and await acknowledgment. The payload
    /// size is the known constant, not read back from the response.
    async fn measure_upload(&self) -> Result<ProbeResult>;

    /// Round-trip a minimal liveness request, returning rounded whole
    /// milliseconds. The response body is ignored.
    async fn measure_ping(&self) -> Result<u64>;
}

/// reqwest-backed probe implementation against a speed-test server
pub struct HttpTransferProbe {
    client: Client,
    download_url: Url,
    upload_url: Url,
    ping_url: Url,
}

impl HttpTransferProbe {
    /// Create a probe against the given base URL.
    ///
    /// The transport timeout is the only upper bound on a hung request;
    /// the session itself imposes none.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| AppError::parse(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("internet-speed-meter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            download_url: Self::endpoint(&base, defaults::DOWNLOAD_PATH)?,
            upload_url: Self::endpoint(&base, defaults::UPLOAD_PATH)?,
            ping_url: Self::endpoint(&base, defaults::PING_PATH)?,
        })
    }

    fn endpoint(base: &Url, path: &str) -> Result<Url> {
        base.join(path)
            .map_err(|e| AppError::parse(format!("Invalid endpoint path '{}': {}", path, e)))
    }
}

#[async_trait]
impl TransferProbe for HttpTransferProbe {
    async fn measure_download(&self) -> Result<ProbeResult> {
        let start = Instant::now();
        let response = self.client.get(self.download_url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.bytes().await?;
        let elapsed = start.elapsed();

        Ok(ProbeResult {
            elapsed,
            payload_bits: body.len() as u64 * 8,
        })
    }

    async fn measure_upload(&self) -> Result<ProbeResult> {
        // Payload construction stays outside the timed window
        let payload = vec![0u8; defaults::UPLOAD_PAYLOAD_BYTES];

        let start = Instant::now();
        let response = self
            .client
            .post(self.upload_url.clone())
            .body(payload)
            .send()
            .await?;
        response.error_for_status()?;
        let elapsed = start.elapsed();

        Ok(ProbeResult {
            elapsed,
            payload_bits: defaults::UPLOAD_PAYLOAD_BYTES as u64 * 8,
        })
    }

    async fn measure_ping(&self) -> Result<u64> {
        let start = Instant::now();
        let response = self.client.get(self.ping_url.clone()).send().await?;
        response.error_for_status()?;

        Ok((start.elapsed().as_secs_f64() * 1000.0).round() as u64)
    }
}
