//! Prometheus metrics for recommendation requests
//!
//! Tracks request outcomes and latency per facade operation.

use actix_web::HttpResponse;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Instant;

lazy_static::lazy_static! {
    /// Requests by operation and outcome (ok/empty/bad_request/error)
    static ref RECOMMENDATION_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "recommendation_requests_total",
        "Recommendation requests by operation and status",
        &["operation", "status"]
    ).expect("Prometheus metrics registration should succeed at startup");

    /// End-to-end latency including the store fetch
    static ref RECOMMENDATION_DURATION: HistogramVec = register_histogram_vec!(
        "recommendation_request_duration_seconds",
        "Recommendation request latency",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Timer for one facade operation; call [`RequestTimer::finish`] with the outcome.
pub struct RequestTimer {
    operation: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn finish(self, status: &str) {
        RECOMMENDATION_DURATION
            .with_label_values(&[self.operation])
            .observe(self.start.elapsed().as_secs_f64());
        RECOMMENDATION_REQUESTS
            .with_label_values(&[self.operation, status])
            .inc();
    }
}

/// GET /metrics
pub async fn metrics_handler() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %err, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
