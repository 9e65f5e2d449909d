use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;

/// Install the global Prometheus recorder and describe the service metrics.
pub fn install_recorder() -> Result<Arc<PrometheusHandle>, metrics_exporter_prometheus::BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!("jobs_created_total", "Jobs added to the registry");
    metrics::describe_counter!("jobs_updated_total", "Job edits applied");
    metrics::describe_counter!("users_created_total", "Accounts created by administrators");
    metrics::describe_counter!("logins_total", "Login attempts by outcome");

    Ok(Arc::new(handle))
}

/// Prometheus scrape endpoint (text exposition format).
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}
