use job_tracker::{config::AppConfig, db, db::seed};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    tracing::warn!(
        database_url = %config.database_url,
        "Resetting database and creating development accounts"
    );

    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to open database");

    let users = seed::reset_and_seed(&db_pool, config.seed_staff_count)
        .await
        .expect("Failed to seed database");

    for user in &users {
        tracing::info!(username = %user.username, role = %user.role, "Account ready");
    }

    db_pool.close().await;
}
