use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{session_queries, user_queries};
use crate::error::{AppError, AppResult};
use crate::models::session::Session;
use crate::models::user::{Role, User};
use crate::services::password;

/// Well-formed Argon2id hash with default parameters that matches no password.
pub(crate) const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$Y0ea1poJCyWCd+yPum+ZQQ$0EuY9I6Pi8wVxq5awFCAHNbc/UKPtfnmXE4W54BzQPo";

/// Verify credentials and open a session.
///
/// Unknown usernames and wrong passwords produce the same `AppError::Auth`.
pub async fn login(
    pool: &SqlitePool,
    username: &str,
    password_input: &str,
    session_ttl: Duration,
) -> AppResult<(Session, User)> {
    let username = username.trim();
    if username.is_empty() || password_input.is_empty() {
        metrics::counter!("logins_total", "outcome" => "rejected").increment(1);
        return Err(AppError::Auth);
    }

    let Some(user) = user_queries::find_by_username(pool, username).await? else {
        // Same Argon2 cost as a real check so timing does not reveal the account
        password::verify_password_blocking(password_input.to_string(), DUMMY_PASSWORD_HASH.to_string())
            .await?;
        warn!(username, "Login attempt for unknown user");
        metrics::counter!("logins_total", "outcome" => "rejected").increment(1);
        return Err(AppError::Auth);
    };

    let valid =
        password::verify_password_blocking(password_input.to_string(), user.password_hash.clone()).await?;
    if !valid {
        warn!(username, "Login attempt with wrong password");
        metrics::counter!("logins_total", "outcome" => "rejected").increment(1);
        return Err(AppError::Auth);
    }

    let now = Utc::now();
    let session = session_queries::insert_session(pool, user.id, now, now + session_ttl).await?;

    info!(username, user_id = user.id, "User logged in");
    metrics::counter!("logins_total", "outcome" => "success").increment(1);

    Ok((session, user))
}

/// Invalidate a session. Unknown ids are ignored.
pub async fn logout(pool: &SqlitePool, session_id: Uuid) -> AppResult<()> {
    if session_queries::delete_session(pool, session_id).await? {
        info!(%session_id, "Session closed");
    }
    Ok(())
}

/// Resolve a session id to its user. Expired sessions are removed.
pub async fn resolve_session(pool: &SqlitePool, session_id: Uuid) -> AppResult<Option<User>> {
    let Some((session, user)) = session_queries::find_session_with_user(pool, session_id).await? else {
        return Ok(None);
    };

    let now = Utc::now();
    if session.is_expired(now) {
        session_queries::delete_expired_sessions(pool, now).await?;
        return Ok(None);
    }

    Ok(Some(user))
}

/// Admins may do anything; other roles must match exactly.
pub fn require_role(user: &User, role: Role) -> AppResult<()> {
    if user.role == Role::Admin || user.role == role {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
