//! Prometheus metrics exposition

use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;

/// Application state for the metrics endpoint.
#[derive(Clone)]
pub struct MetricsAppState {
    pub prometheus: PrometheusHandle,
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Metrics",
    responses(
        (status = 200, description = "Prometheus text exposition", body = String)
    )
)]
pub async fn render_metrics(State(state): State<MetricsAppState>) -> String {
    state.prometheus.render()
}
