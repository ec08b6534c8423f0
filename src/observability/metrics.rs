use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Global metrics instance.
pub static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Metrics collector for the ledger. Calls are no-ops until a recorder is installed.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self
    }

    pub fn record_transaction_recorded(&self, transaction_type: &str, currency: &str) {
        counter!("ledger_transactions_recorded_total", "type" => transaction_type.to_string(), "currency" => currency.to_string()).increment(1);
    }

    pub fn record_transaction_rejected(&self, transaction_type: &str, reason: &str) {
        counter!("ledger_transactions_rejected_total", "type" => transaction_type.to_string(), "reason" => reason.to_string()).increment(1);
    }

    pub fn record_entries_appended(&self, count: usize) {
        counter!("ledger_entries_appended_total").increment(count as u64);
    }

    pub fn record_ledger_write_latency(&self, duration_ms: f64) {
        histogram!("ledger_write_duration_ms").record(duration_ms);
    }

    pub fn record_integrity_failure(&self, check: &str) {
        counter!("ledger_integrity_failures_total", "check" => check.to_string()).increment(1);
    }
}

/// Timer for measuring operation latency.
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Initializes the metrics system and returns the Prometheus handle.
pub fn init_metrics() -> PrometheusHandle {
    let handle = METRICS_HANDLE.get_or_init(|| {
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        describe_metrics();
        handle
    });

    METRICS.get_or_init(Metrics::new);

    handle.clone()
}

/// Describes all metrics for Prometheus.
fn describe_metrics() {
    describe_counter!("ledger_transactions_recorded_total", Unit::Count, "Total number of ledger transactions recorded");
    describe_counter!("ledger_transactions_rejected_total", Unit::Count, "Total number of ledger operations rejected");
    describe_counter!("ledger_entries_appended_total", Unit::Count, "Total number of entries appended to the log");
    describe_counter!("ledger_integrity_failures_total", Unit::Count, "Balance or transaction verifications that failed");

    describe_histogram!("ledger_write_duration_ms", Unit::Milliseconds, "Atomic entry-set write latency in milliseconds");
}

/// Returns the global metrics instance.
pub fn get_metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::new)
}
