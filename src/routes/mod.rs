use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

pub mod api;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod metrics;
pub mod session;
pub mod users;

/// Form bodies are small; anything larger is rejected.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Build the full application router.
///
/// `/metrics` is only mounted when a Prometheus recorder is installed.
pub fn router(state: AppState, prometheus: Option<Arc<PrometheusHandle>>) -> Router {
    let mut app = Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/health", get(health::health_check))
        // Form surface
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(jobs::dashboard))
        .route("/jobs/add", get(jobs::add_job_form).post(jobs::add_job))
        .route("/jobs/{id}/edit", get(jobs::edit_job_form).post(jobs::edit_job))
        .route("/users", get(users::list_users))
        .route("/users/add", post(users::add_user))
        // JSON API
        .route("/api/v1/jobs", get(api::list_jobs).post(api::create_job))
        .route("/api/v1/jobs/{id}", get(api::get_job).patch(api::update_job))
        .route("/api/v1/users", get(api::list_users).post(api::create_user))
        .with_state(state);

    if let Some(handle) = prometheus {
        app = app.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(handle),
        );
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
}
