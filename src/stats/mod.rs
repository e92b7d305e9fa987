//! Rate conversion and aggregation math for measurement samples

/// Divisor converting bits per second into megabits per second (1024 * 1024)
const BITS_PER_MEGABIT: f64 = 1_048_576.0;

/// Convert a payload size and elapsed time into a throughput rate in Mbps.
///
/// Pure conversion with no internal guards: the probe's timer strictly
/// brackets non-zero-duration I/O, so `elapsed_seconds` is never zero in
/// practice. Full precision is retained here; rounding happens only at
/// display time via [`format_mbps`].
pub fn to_megabits_per_second(payload_bits: u64, elapsed_seconds: f64) -> f64 {
    payload_bits as f64 / elapsed_seconds / BITS_PER_MEGABIT
}

/// Arithmetic mean of a sample sequence.
///
/// An empty sequence averages to `0.0` rather than NaN, so a session where
/// every cycle failed still displays "0.00 Mbps" instead of an error.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Format a throughput rate for display, two decimals with unit suffix
pub fn format_mbps(rate: f64) -> String {
    format!("{:.2} Mbps", rate)
}

/// Format a latency value for display
pub fn format_ping(milliseconds: u64) -> String {
    format!("{} ms", milliseconds)
}
