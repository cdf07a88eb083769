//! Prometheus metrics

use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

/// Install the global Prometheus recorder
///
/// Safe to call more than once; the recorder is installed on the first call
/// only. Returns `None` if another recorder was already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install Prometheus recorder");
                None
            }
        })
        .clone()
}

/// `GET /metrics`
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS.get().and_then(Option::as_ref) {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics not enabled".to_string(),
        ),
    }
}

/// One extraction served, with the number of fields it recognized
pub fn record_extraction(fields: usize) {
    metrics::counter!("autofill_extractions_total").increment(1);
    metrics::histogram!("autofill_extraction_fields").record(fields as f64);
}

pub fn record_fields_filled(filled: usize) {
    metrics::counter!("autofill_fields_filled_total").increment(filled as u64);
}

pub fn record_error(kind: &'static str) {
    metrics::counter!("autofill_errors_total", "kind" => kind).increment(1);
}
