//! Shared setup for integration and end-to-end tests.
#![allow(dead_code)]

use job_tracker::{
    app_state::AppState,
    config::AppConfig,
    db::{self, seed},
    models::job::{Job, NewJob},
    models::user::User,
    routes,
    services::registry,
};
use reqwest::redirect::Policy;
use sqlx::SqlitePool;

use crate::fixtures::SAMPLE_JOBS;

pub const MEMORY_DB: &str = "sqlite::memory:";

/// Fresh in-memory database seeded with `admin` and `staff_count` staff users.
pub async fn seeded_pool(staff_count: u32) -> (SqlitePool, Vec<User>) {
    let pool = db::init_pool(MEMORY_DB).await.expect("Failed to open database");
    let users = seed::reset_and_seed(&pool, staff_count)
        .await
        .expect("Failed to seed database");
    (pool, users)
}

/// Seeded database in a temporary file, with the same WAL setup as
/// production. Keep the returned directory alive for the test's duration.
pub async fn seeded_file_pool(staff_count: u32) -> (tempfile::TempDir, SqlitePool, Vec<User>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("jobs.db").display());
    let pool = db::init_pool(&url).await.expect("Failed to open database");
    let users = seed::reset_and_seed(&pool, staff_count)
        .await
        .expect("Failed to seed database");
    (dir, pool, users)
}

pub fn find_user<'a>(users: &'a [User], username: &str) -> &'a User {
    users
        .iter()
        .find(|u| u.username == username)
        .unwrap_or_else(|| panic!("seeded user {username} missing"))
}

pub fn new_job(reference: &str, importer_name: &str) -> NewJob {
    NewJob {
        reference: reference.to_string(),
        importer_name: importer_name.to_string(),
        ..Default::default()
    }
}

/// Insert every sample job in order.
pub async fn insert_sample_jobs(pool: &SqlitePool) -> Vec<Job> {
    let mut jobs = Vec::new();
    for fixture in SAMPLE_JOBS {
        let job = registry::add_job(
            pool,
            NewJob {
                reference: fixture.reference.to_string(),
                importer_name: fixture.importer_name.to_string(),
                received_time: None,
                assigned_username: fixture.assignee.map(str::to_string),
                status: fixture.status.map(str::to_string),
            },
        )
        .await
        .expect("Failed to insert sample job");
        jobs.push(job);
    }
    jobs
}

/// Serve the full router on an ephemeral port and return its base URL.
pub async fn spawn_app(pool: SqlitePool) -> String {
    let state = AppState::new(pool, &AppConfig::for_database(MEMORY_DB));
    let app = routes::router(state, None);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{addr}")
}

/// Browser-like client: keeps cookies, does not follow redirects.
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to build HTTP client")
}

/// Location header of a redirect response.
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Log in through the form and assert the redirect to the dashboard.
pub async fn login(client: &reqwest::Client, base_url: &str, username: &str, password: &str) {
    let response = client
        .post(format!("{base_url}/login"))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Login request failed");

    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard", "login as {username} rejected");
}
