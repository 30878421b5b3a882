//! Tracker Telemetry - Observability Infrastructure
//!
//! Structured logging through `tracing` and Prometheus metrics for the
//! API layer. Nothing here requires an external collector.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics_handler, TrackerMetrics, METRICS};
pub use middleware::observability_middleware;
pub use tracer::{init_tracing, LogFormat, TelemetryConfig};
