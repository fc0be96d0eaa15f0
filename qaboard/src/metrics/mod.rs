//! Prometheus metrics.
//!
//! Points movement is counted in [`points`] on the default `prometheus` registry. HTTP request
//! metrics come from `axum-prometheus`; [`render`] concatenates both for `/internal/metrics`.

pub mod points;

use prometheus::{Encoder, TextEncoder};

/// Render the axum-prometheus request metrics followed by the points counters.
pub fn render(request_metrics: String) -> String {
    let mut output = request_metrics;

    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    match encoder.encode(&prometheus::gather(), &mut buffer) {
        Ok(()) => output.push_str(&String::from_utf8_lossy(&buffer)),
        Err(e) => tracing::warn!("Failed to encode points metrics: {}", e),
    }

    output
}
