//! The sampling loop: drives repeated probe invocation for one session
//!
//! A session runs a fixed number of strictly sequential cycles (download
//! then upload), emits one sample per fully successful cycle to the live
//! series, reduces the per-direction sample vectors to averages, and
//! finishes with a single ping probe. Probe failures never abort the
//! session; they are logged and the loop moves on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::{
    logging::Logger,
    models::{HeadlineMetrics, MetricField, Sample, SessionReport},
    probe::TransferProbe,
    stats,
};

/// Read-only observer of session progress.
///
/// Implementations must not assume more than one callback runs at a time;
/// the session is single-writer and invokes these strictly in order.
pub trait ProgressSink: Send + Sync {
    /// A session has been triggered and will run `cycle_count` cycles
    fn on_session_started(&self, _cycle_count: u64) {}

    /// One cycle completed in both directions; `sample` was appended to
    /// the live series
    fn on_sample(&self, _sample: &Sample) {}

    /// One or more headline fields changed state
    fn on_headline(&self, _metrics: &HeadlineMetrics) {}

    /// The session ran to completion
    fn on_session_finished(&self, _report: &SessionReport) {}
}

/// Per-run sample accumulators, owned exclusively by the sampling loop
#[derive(Debug, Default)]
struct RunState {
    download_samples: Vec<f64>,
    upload_samples: Vec<f64>,
}

/// One-shot-at-a-time measurement session driver.
///
/// `Idle -> Running -> Idle`; re-triggering while running is a no-op.
/// There is no pause, cancellation, or session-level timeout — a hung
/// request is bounded only by the probe transport's own timeout.
pub struct SpeedTestSession {
    probe: Arc<dyn TransferProbe>,
    logger: Logger,
    cadence_ms: u64,
    total_duration_ms: u64,
    running: AtomicBool,
}

impl SpeedTestSession {
    pub fn new(
        probe: Arc<dyn TransferProbe>,
        logger: Logger,
        cadence_ms: u64,
        total_duration_ms: u64,
    ) -> Self {
        Self {
            probe,
            logger,
            cadence_ms,
            total_duration_ms,
            running: AtomicBool::new(false),
        }
    }

    /// Whether a session is currently in flight
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Trigger one measurement session.
    ///
    /// Returns `None` without side effects when a session is already
    /// running. The running flag is always cleared on completion; no
    /// probe failure can leave it stuck.
    pub async fn run(&self, sink: &dyn ProgressSink) -> Option<SessionReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }

        let report = self.run_cycles(sink).await;
        self.running.store(false, Ordering::SeqCst);

        sink.on_session_finished(&report);
        Some(report)
    }

    async fn run_cycles(&self, sink: &dyn ProgressSink) -> SessionReport {
        let started_at = Utc::now();
        let cycle_count = self
            .total_duration_ms
            .checked_div(self.cadence_ms)
            .unwrap_or(0);

        let mut state = RunState::default();
        let mut samples: Vec<Sample> = Vec::new();
        let mut headline = HeadlineMetrics::in_progress();

        sink.on_session_started(cycle_count);
        sink.on_headline(&headline);

        for cycle in 0..cycle_count {
            let download_mbps = match self.probe.measure_download().await {
                Ok(result) => {
                    let rate =
                        stats::to_megabits_per_second(result.payload_bits, result.elapsed_seconds());
                    state.download_samples.push(rate);
                    Some(rate)
                }
                Err(e) => {
                    self.logger
                        .error(format!("Download probe failed in cycle {}: {}", cycle, e));
                    None
                }
            };

            let upload_mbps = match self.probe.measure_upload().await {
                Ok(result) => {
                    let rate =
                        stats::to_megabits_per_second(result.payload_bits, result.elapsed_seconds());
                    state.upload_samples.push(rate);
                    Some(rate)
                }
                Err(e) => {
                    self.logger
                        .error(format!("Upload probe failed in cycle {}: {}", cycle, e));
                    None
                }
            };

            if let (Some(download), Some(upload)) = (download_mbps, upload_mbps) {
                let sample = Sample::new(cycle, download, upload);
                sink.on_sample(&sample);
                samples.push(sample);
            }
        }

        // Each direction averages over its own successful attempts; an
        // all-failure run displays "0.00 Mbps", not an error marker.
        let average_download_mbps = stats::mean(&state.download_samples);
        let average_upload_mbps = stats::mean(&state.upload_samples);

        headline.download = MetricField::Value(stats::format_mbps(average_download_mbps));
        headline.upload = MetricField::Value(stats::format_mbps(average_upload_mbps));
        sink.on_headline(&headline);

        let ping_ms = match self.probe.measure_ping().await {
            Ok(ms) => {
                headline.ping = MetricField::Value(stats::format_ping(ms));
                Some(ms)
            }
            Err(e) => {
                self.logger.error(format!("Ping probe failed: {}", e));
                headline.ping = MetricField::Failed;
                None
            }
        };
        sink.on_headline(&headline);

        SessionReport {
            started_at,
            completed_at: Utc::now(),
            cycle_count,
            successful_cycles: samples.len() as u64,
            download_sample_count: state.download_samples.len() as u64,
            upload_sample_count: state.upload_samples.len() as u64,
            average_download_mbps,
            average_upload_mbps,
            ping_ms,
            headline,
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use crate::probe::ProbeResult;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicU64;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted probe: pops one outcome per invocation, per operation
    #[derive(Default)]
    struct ScriptedProbe {
        downloads: Mutex<VecDeque<Result<ProbeResult>>>,
        uploads: Mutex<VecDeque<Result<ProbeResult>>>,
        pings: Mutex<VecDeque<Result<u64>>>,
        ping_calls: AtomicU64,
    }

    fn ok_result(payload_bits: u64, elapsed_ms: u64) -> Result<ProbeResult> {
        Ok(ProbeResult {
            elapsed: Duration::from_millis(elapsed_ms),
            payload_bits,
        })
    }

    fn failed() -> Result<ProbeResult> {
        Err(AppError::network("connection refused"))
    }

    #[async_trait]
    impl TransferProbe for ScriptedProbe {
        async fn measure_download(&self) -> Result<ProbeResult> {
            self.downloads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(failed)
        }

        async fn measure_upload(&self) -> Result<ProbeResult> {
            self.uploads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(failed)
        }

        async fn measure_ping(&self) -> Result<u64> {
            self.ping_calls.fetch_add(1, Ordering::SeqCst);
            self.pings
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(AppError::network("connection refused")))
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        samples: Mutex<Vec<Sample>>,
        headlines: Mutex<Vec<HeadlineMetrics>>,
    }

    impl ProgressSink for CollectingSink {
        fn on_sample(&self, sample: &Sample) {
            self.samples.lock().unwrap().push(sample.clone());
        }

        fn on_headline(&self, metrics: &HeadlineMetrics) {
            self.headlines.lock().unwrap().push(metrics.clone());
        }
    }

    fn session_over(
        probe: Arc<ScriptedProbe>,
        cadence_ms: u64,
        duration_ms: u64,
    ) -> SpeedTestSession {
        SpeedTestSession::new(probe, Logger::for_tests(), cadence_ms, duration_ms)
    }

    #[tokio::test]
    async fn test_three_cycles_emit_samples_in_order() {
        let probe = Arc::new(ScriptedProbe::default());
        for _ in 0..3 {
            // 1 MiB in 100 ms both ways: 80 Mbps
            probe.downloads.lock().unwrap().push_back(ok_result(8_388_608, 100));
            probe.uploads.lock().unwrap().push_back(ok_result(8_388_608, 100));
        }
        probe.pings.lock().unwrap().push_back(Ok(23));

        let sink = CollectingSink::default();
        let session = session_over(probe, 100, 300);
        let report = session.run(&sink).await.unwrap();

        assert_eq!(report.cycle_count, 3);
        assert_eq!(report.successful_cycles, 3);
        let labels: Vec<&str> = report.samples.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["0s", "1s", "2s"]);
        assert_eq!(sink.samples.lock().unwrap().len(), 3);

        assert!((report.average_download_mbps - 80.0).abs() < 1e-9);
        assert_eq!(report.headline.download.display(), "80.00 Mbps");
        assert_eq!(report.headline.ping.display(), "23 ms");
        assert_eq!(report.ping_ms, Some(23));
    }

    #[test]
    fn test_headline_passes_through_in_progress_state() {
        tokio_test::block_on(async {
            let probe = Arc::new(ScriptedProbe::default());
            probe.pings.lock().unwrap().push_back(Ok(5));

            let sink = CollectingSink::default();
            let session = session_over(probe, 1_000, 0);
            session.run(&sink).await.unwrap();

            let headlines = sink.headlines.lock().unwrap();
            assert_eq!(headlines.first().unwrap(), &HeadlineMetrics::in_progress());
            assert!(headlines.last().unwrap().ping.is_final());
        });
    }

    #[tokio::test]
    async fn test_all_failures_still_complete_with_zero_averages() {
        let probe = Arc::new(ScriptedProbe::default());
        // No scripted bandwidth outcomes: every cycle fails
        probe.pings.lock().unwrap().push_back(Ok(12));

        let sink = CollectingSink::default();
        let session = session_over(probe.clone(), 100, 300);
        let report = session.run(&sink).await.unwrap();

        assert_eq!(report.successful_cycles, 0);
        assert!(report.samples.is_empty());
        assert_eq!(report.headline.download.display(), "0.00 Mbps");
        assert_eq!(report.headline.upload.display(), "0.00 Mbps");
        assert_eq!(report.headline.ping.display(), "12 ms");
        assert_eq!(probe.ping_calls.load(Ordering::SeqCst), 1);
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn test_asymmetric_failure_diverges_sample_counts() {
        let probe = Arc::new(ScriptedProbe::default());
        // Downloads succeed in both cycles; upload fails in the second
        probe.downloads.lock().unwrap().push_back(ok_result(8_388_608, 100));
        probe.downloads.lock().unwrap().push_back(ok_result(8_388_608, 100));
        probe.uploads.lock().unwrap().push_back(ok_result(4_194_304, 100));
        probe.pings.lock().unwrap().push_back(Ok(1));

        let sink = CollectingSink::default();
        let session = session_over(probe, 100, 200);
        let report = session.run(&sink).await.unwrap();

        // Only the fully successful cycle produced a sample, but the
        // download vector kept both of its measurements
        assert_eq!(report.successful_cycles, 1);
        assert_eq!(report.download_sample_count, 2);
        assert_eq!(report.upload_sample_count, 1);
        assert!((report.average_download_mbps - 80.0).abs() < 1e-9);
        assert!((report.average_upload_mbps - 40.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_ping_failure_publishes_error_marker() {
        let probe = Arc::new(ScriptedProbe::default());
        // Ping queue left empty: the single ping attempt fails

        let sink = CollectingSink::default();
        let session = session_over(probe, 1_000, 0);
        let report = session.run(&sink).await.unwrap();

        assert_eq!(report.headline.ping, MetricField::Failed);
        assert_eq!(report.headline.ping.display(), "Error");
        assert_eq!(report.ping_ms, None);
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn test_zero_cycles_still_ping_exactly_once() {
        let probe = Arc::new(ScriptedProbe::default());
        probe.pings.lock().unwrap().push_back(Ok(7));

        let sink = CollectingSink::default();
        // duration < cadence: zero bandwidth cycles
        let session = session_over(probe.clone(), 1_000, 300);
        let report = session.run(&sink).await.unwrap();

        assert_eq!(report.cycle_count, 0);
        assert!(report.samples.is_empty());
        assert_eq!(report.headline.download.display(), "0.00 Mbps");
        assert_eq!(report.headline.upload.display(), "0.00 Mbps");
        assert_eq!(report.ping_ms, Some(7));
        assert_eq!(probe.ping_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_trigger_is_noop_while_running() {
        /// Probe whose download suspends long enough to overlap triggers
        struct SlowProbe;

        #[async_trait]
        impl TransferProbe for SlowProbe {
            async fn measure_download(&self) -> Result<ProbeResult> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                ok_result(8_388_608, 200)
            }

            async fn measure_upload(&self) -> Result<ProbeResult> {
                ok_result(8_388_608, 10)
            }

            async fn measure_ping(&self) -> Result<u64> {
                Ok(3)
            }
        }

        let session = Arc::new(SpeedTestSession::new(
            Arc::new(SlowProbe),
            Logger::for_tests(),
            100,
            100,
        ));

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.run(&CollectingSink::default()).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.is_running());

        let second_sink = CollectingSink::default();
        assert!(session.run(&second_sink).await.is_none());
        assert!(second_sink.samples.lock().unwrap().is_empty());

        let report = first.await.unwrap().unwrap();
        assert_eq!(report.successful_cycles, 1);
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn test_average_matches_sum_over_count() {
        let probe = Arc::new(ScriptedProbe::default());
        // Distinct rates: 80, 40, 20 Mbps
        probe.downloads.lock().unwrap().push_back(ok_result(8_388_608, 100));
        probe.downloads.lock().unwrap().push_back(ok_result(4_194_304, 100));
        probe.downloads.lock().unwrap().push_back(ok_result(2_097_152, 100));
        for _ in 0..3 {
            probe.uploads.lock().unwrap().push_back(ok_result(8_388_608, 100));
        }
        probe.pings.lock().unwrap().push_back(Ok(1));

        let sink = CollectingSink::default();
        let session = session_over(probe, 100, 300);
        let report = session.run(&sink).await.unwrap();

        let expected = (80.0 + 40.0 + 20.0) / 3.0;
        assert!((report.average_download_mbps - expected).abs() < 1e-9);
        assert_eq!(
            report.headline.download.display(),
            stats::format_mbps(expected)
        );
    }
}
