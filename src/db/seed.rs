//! Development bootstrap. Resets the schema and creates default accounts
//! with predictable passwords; never run against production data.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::{self, user_queries};
use crate::error::AppResult;
use crate::models::user::{Role, User};
use crate::services::password;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Deterministic credentials for the n-th staff account (1-based).
pub fn staff_credentials(n: u32) -> (String, String) {
    (format!("user{n:02}"), format!("Pass{n:02}!"))
}

/// Drop and recreate the schema, then create one admin and `staff_count`
/// staff accounts. Safe to run repeatedly.
pub async fn reset_and_seed(pool: &SqlitePool, staff_count: u32) -> AppResult<Vec<User>> {
    db::reset_schema(pool).await?;

    let mut accounts = vec![(
        ADMIN_USERNAME.to_string(),
        "Administrator".to_string(),
        ADMIN_PASSWORD.to_string(),
        Role::Admin,
    )];
    for n in 1..=staff_count {
        let (username, password) = staff_credentials(n);
        accounts.push((username, format!("Staff User {n:02}"), password, Role::Staff));
    }

    // Hash outside the transaction so the write lock is held briefly.
    let mut hashed = Vec::with_capacity(accounts.len());
    for (username, full_name, plain, role) in accounts {
        let hash = password::hash_password_blocking(plain).await?;
        hashed.push((username, full_name, hash, role));
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;
    let mut users = Vec::with_capacity(hashed.len());
    for (username, full_name, hash, role) in &hashed {
        let user = user_queries::insert_user(&mut *tx, username, Some(full_name.as_str()), hash, *role, now).await?;
        users.push(user);
    }
    tx.commit().await?;

    info!(admins = 1, staff = staff_count, "Seeded development accounts");
    Ok(users)
}
