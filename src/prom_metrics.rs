//! # Prometheus Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `timeclock_submissions_total` | Counter | `outcome` | Clock-in submissions by result |
//! | `timeclock_job_list_failures_total` | Counter | - | Job listings that degraded to empty |
//! | `timeclock_http_request_duration_seconds` | Histogram | `method`, `path` | Request latency |
//!
//! The `/metrics` endpoint renders the current registry state on each scrape.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OutcomeLabel {
    pub outcome: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabel {
    pub method: String,
    pub path: String,
}

type HistogramFamily = Family<HttpLabel, Histogram, fn() -> Histogram>;

fn latency_histogram() -> Histogram {
    // 5 ms .. ~10 s
    Histogram::new(exponential_buckets(0.005, 2.0, 12))
}

/// All fields are atomic and safe to update from any task.
pub struct Metrics {
    pub registry: Registry,
    pub submissions: Family<OutcomeLabel, Counter>,
    pub job_list_failures: Counter,
    pub http_request_duration: HistogramFamily,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let submissions = Family::<OutcomeLabel, Counter>::default();
        registry.register(
            "timeclock_submissions",
            "Clock-in submissions by outcome",
            submissions.clone(),
        );

        let job_list_failures = Counter::default();
        registry.register(
            "timeclock_job_list_failures",
            "Job listings that failed and rendered an empty list",
            job_list_failures.clone(),
        );

        let http_request_duration: HistogramFamily =
            Family::new_with_constructor(latency_histogram);
        registry.register(
            "timeclock_http_request_duration_seconds",
            "HTTP request latency in seconds",
            http_request_duration.clone(),
        );

        Self {
            registry,
            submissions,
            job_list_failures,
            http_request_duration,
        }
    }

    pub fn record_submission(&self, outcome: &str) {
        self.submissions
            .get_or_create(&OutcomeLabel {
                outcome: outcome.to_string(),
            })
            .inc();
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        if let Err(e) = encode(&mut buf, &self.registry) {
            tracing::error!(error = %e, "failed to encode metrics");
        }
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
