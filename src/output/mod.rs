//! Result reporters consuming the session's live sample stream
//!
//! Reporters are read-only observers: they render each emitted sample as
//! it arrives (progressive chart) and the headline block when the session
//! finishes. They never mutate session state.

use crate::{
    models::{Config, HeadlineMetrics, MetricField, Sample, SessionReport},
    session::ProgressSink,
};
use colored::Colorize;

/// Throughput represented by one chart cell
const MBPS_PER_CELL: f64 = 4.0;

/// Maximum chart bar width in cells
const MAX_BAR_CELLS: usize = 30;

/// Console reporter: live per-cycle lines plus a final headline block
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn bar(rate_mbps: f64) -> String {
        let cells = ((rate_mbps / MBPS_PER_CELL).round() as usize).min(MAX_BAR_CELLS);
        "█".repeat(cells.max(1))
    }

    fn headline_value(field: &MetricField) -> colored::ColoredString {
        match field {
            MetricField::Failed => field.display().red().bold(),
            MetricField::Value(_) => field.display().bold(),
            _ => field.display().dimmed(),
        }
    }
}

impl ProgressSink for ConsoleReporter {
    fn on_session_started(&self, cycle_count: u64) {
        println!(
            "{} ({} cycles)",
            "Running speed test...".bold(),
            cycle_count
        );
    }

    fn on_sample(&self, sample: &Sample) {
        println!(
            "  {:>4}  down {:>12}  {}",
            sample.label,
            crate::stats::format_mbps(sample.download_mbps),
            Self::bar(sample.download_mbps).blue()
        );
        println!(
            "        up   {:>12}  {}",
            crate::stats::format_mbps(sample.upload_mbps),
            Self::bar(sample.upload_mbps).green()
        );
    }

    fn on_headline(&self, _metrics: &HeadlineMetrics) {
        // Headlines are rendered once, from the finished report
    }

    fn on_session_finished(&self, report: &SessionReport) {
        println!();
        println!(
            "  Download: {}",
            Self::headline_value(&report.headline.download)
        );
        println!(
            "  Upload:   {}",
            Self::headline_value(&report.headline.upload)
        );
        println!(
            "  Ping:     {}",
            Self::headline_value(&report.headline.ping)
        );

        if self.verbose {
            println!();
            println!(
                "  {} of {} cycles succeeded ({} download / {} upload samples)",
                report.successful_cycles,
                report.cycle_count,
                report.download_sample_count,
                report.upload_sample_count
            );
            let elapsed = report.completed_at - report.started_at;
            println!("  Session took {} ms", elapsed.num_milliseconds());
        }
    }
}

/// JSON reporter: silent during the run, one pretty-printed report at the end
pub struct JsonReporter;

impl ProgressSink for JsonReporter {
    fn on_session_finished(&self, report: &SessionReport) {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize session report: {}", e),
        }
    }
}

/// Create the reporter matching the configured output mode
pub fn create_reporter(config: &Config) -> Box<dyn ProgressSink> {
    if config.json_output {
        Box::new(JsonReporter)
    } else {
        Box::new(ConsoleReporter::new(config.verbose))
    }
}
