//! Prometheus Metrics Definitions
//!
//! Defines the tracker's metrics with their labels and exposes the
//! `/metrics` endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, 20s
/// (upstream fetches may take up to the 15s client timeout)
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 20.0,
];

/// Global metrics instance - initialized once on first use
pub static METRICS: Lazy<ApiResult<TrackerMetrics>> = Lazy::new(TrackerMetrics::new);

/// Container for all tracker metrics.
#[derive(Clone)]
pub struct TrackerMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Performance envelopes served - labels: source (cache/api/demo)
    pub performance_responses_total: CounterVec,

    /// Upstream fetch attempts - labels: outcome
    pub upstream_fetches_total: CounterVec,
}

impl TrackerMetrics {
    /// Create and register all metrics with the default Prometheus registry.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "mgnrega_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| registration_error("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "mgnrega_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("http_request_duration_seconds", e))?,

            performance_responses_total: register_counter_vec!(
                "mgnrega_performance_responses_total",
                "Performance responses by data source",
                &["source"]
            )
            .map_err(|e| registration_error("performance_responses_total", e))?,

            upstream_fetches_total: register_counter_vec!(
                "mgnrega_upstream_fetches_total",
                "Upstream fetch attempts by outcome",
                &["outcome"]
            )
            .map_err(|e| registration_error("upstream_fetches_total", e))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    pub fn record_performance_response(&self, source: &str) {
        self.performance_responses_total
            .with_label_values(&[source])
            .inc();
    }

    pub fn record_upstream_fetch(&self, outcome: &str) {
        self.upstream_fetches_total
            .with_label_values(&[outcome])
            .inc();
    }
}

fn registration_error(name: &str, err: prometheus::Error) -> ApiError {
    ApiError::internal_error(format!("Failed to register {}: {}", name, err))
}

/// The global metrics, or `None` if registration failed.
fn metrics() -> Option<&'static TrackerMetrics> {
    match METRICS.as_ref() {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            tracing::warn!(error = %e, "Metrics unavailable");
            None
        }
    }
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    if let Some(m) = metrics() {
        m.record_http_request(method, path, status, duration_secs);
    }
}

pub fn record_performance_response(source: &str) {
    if let Some(m) = metrics() {
        m.record_performance_response(source);
    }
}

pub fn record_upstream_fetch(outcome: &str) {
    if let Some(m) = metrics() {
        m.record_upstream_fetch(outcome);
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
))]
pub async fn metrics_handler() -> impl IntoResponse {
    // Make sure the tracker's own families are registered before gathering.
    let _ = metrics();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::core::Collector;

    #[test]
    fn test_metrics_creation() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        assert!(!metrics.http_requests_total.desc().is_empty());
        Ok(())
    }

    #[test]
    fn test_record_performance_response_increments() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        let counter = metrics.performance_responses_total.with_label_values(&["demo"]);
        let before = counter.get();
        record_performance_response("demo");
        assert!(counter.get() >= before + 1.0);
        Ok(())
    }

    #[test]
    fn test_record_upstream_fetch_increments() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        let counter = metrics.upstream_fetches_total.with_label_values(&["timeout"]);
        let before = counter.get();
        record_upstream_fetch("timeout");
        assert!(counter.get() >= before + 1.0);
        Ok(())
    }

    #[test]
    fn test_record_http_request_counts_and_observes() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        let counter = metrics
            .http_requests_total
            .with_label_values(&["GET", "/api/performance/cached", "200"]);
        let histogram = metrics
            .http_request_duration_seconds
            .with_label_values(&["GET", "/api/performance/cached"]);
        let (count_before, samples_before) = (counter.get(), histogram.get_sample_count());

        record_http_request("GET", "/api/performance/cached", 200, 0.015);

        assert!(counter.get() >= count_before + 1.0);
        assert!(histogram.get_sample_count() > samples_before);
        Ok(())
    }
}
