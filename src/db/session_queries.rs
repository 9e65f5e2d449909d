use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::user_queries::user_from_row;
use crate::models::session::Session;
use crate::models::user::User;

/// Create a session for a user
pub async fn insert_session(
    pool: &SqlitePool,
    user_id: i64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<Session, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, created_at, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(user_id)
    .bind(created_at)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(Session {
        id,
        user_id,
        created_at,
        expires_at,
    })
}

/// Look up a session together with the user it belongs to
pub async fn find_session_with_user(
    pool: &SqlitePool,
    session_id: Uuid,
) -> Result<Option<(Session, User)>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT s.id AS session_id, s.created_at AS session_created_at, s.expires_at,
               u.id, u.username, u.full_name, u.password_hash, u.role, u.created_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.id = ?
        "#,
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(r) => {
            let user = user_from_row(&r)?;
            let session = Session {
                id: session_id,
                user_id: user.id,
                created_at: r.try_get("session_created_at")?,
                expires_at: r.try_get("expires_at")?,
            };
            Ok(Some((session, user)))
        }
        None => Ok(None),
    }
}

/// Delete a session. Returns whether a row was removed.
pub async fn delete_session(pool: &SqlitePool, session_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(session_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove every session that expired before `now`
pub async fn delete_expired_sessions(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
