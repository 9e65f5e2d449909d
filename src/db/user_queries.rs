use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};
use std::str::FromStr;

use crate::models::user::{Role, User};

const USER_COLUMNS: &str = "id, username, full_name, password_hash, role, created_at";

pub(crate) fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        full_name: row.try_get("full_name")?,
        password_hash: row.try_get("password_hash")?,
        role: Role::from_str(&role).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a user. Fails with a unique violation if the username is taken.
pub async fn insert_user<'e, E>(
    executor: E,
    username: &str,
    full_name: Option<&str>,
    password_hash: &str,
    role: Role,
    created_at: DateTime<Utc>,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO users (username, full_name, password_hash, role, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(username)
    .bind(full_name)
    .bind(password_hash)
    .bind(role.as_ref())
    .bind(created_at)
    .fetch_one(executor)
    .await?;

    user_from_row(&row)
}

/// Find a user by exact username
pub async fn find_by_username<'e, E>(executor: E, username: &str) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Find a user by id
pub async fn find_by_id<'e, E>(executor: E, user_id: i64) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// All users ordered by username
pub async fn list_users<'e, E>(executor: E) -> Result<Vec<User>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username ASC"))
        .fetch_all(executor)
        .await?;

    rows.iter().map(user_from_row).collect()
}
