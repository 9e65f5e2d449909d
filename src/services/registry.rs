//! Job and user registry operations.
//!
//! Every mutation runs in a single transaction. Uniqueness of job
//! references and usernames is enforced by the database, so a duplicate
//! is detected at commit time even under concurrent submissions.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::job_queries::{self, JobChanges, JobRow};
use crate::db::user_queries;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::models::job::{non_empty, parse_received_time, Job, JobFilter, JobUpdate, NewJob, DEFAULT_STATUS};
use crate::models::user::{Role, User};
use crate::services::{auth, password};

/// List jobs matching all supplied filters, newest first.
pub async fn list_jobs(pool: &SqlitePool, filter: &JobFilter) -> AppResult<Vec<Job>> {
    Ok(job_queries::list_jobs(pool, filter).await?)
}

/// Fetch one job
pub async fn get_job(pool: &SqlitePool, job_id: i64) -> AppResult<Job> {
    job_queries::get_job(pool, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))
}

/// Create a job.
///
/// An unknown assignee does not fail the request: the job is stored
/// unassigned and a warning is logged. Callers can detect this by
/// comparing the requested username with `Job::assignee_username`.
pub async fn add_job(pool: &SqlitePool, new_job: NewJob) -> AppResult<Job> {
    let reference = required(&new_job.reference, "Shipment reference")?;
    let importer_name = required(&new_job.importer_name, "Importer name")?;

    let received_at = new_job
        .received_time
        .as_deref()
        .and_then(parse_received_time)
        .unwrap_or_else(Utc::now);
    let status = non_empty(new_job.status.as_deref()).unwrap_or(DEFAULT_STATUS);

    // The INSERT must open the transaction: under WAL a read transaction
    // cannot be upgraded to a write once another writer has committed.
    let assignee_id = resolve_assignee(pool, new_job.assigned_username.as_deref()).await?;

    let mut tx = pool.begin().await?;

    let row = JobRow {
        reference,
        importer_name,
        received_at,
        status,
        assignee_id,
    };
    let job_id = match job_queries::insert_job(&mut *tx, &row, Utc::now()).await {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict(format!(
                "A job with reference '{reference}' already exists"
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let job = job_queries::get_job(&mut *tx, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;

    tx.commit().await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("A job with reference '{reference}' already exists"))
        } else {
            e.into()
        }
    })?;

    info!(job_id, reference, status, "Job created");
    metrics::counter!("jobs_created_total").increment(1);

    Ok(job)
}

/// Apply a partial update to a job and bump its update timestamp.
pub async fn update_job(pool: &SqlitePool, job_id: i64, update: JobUpdate) -> AppResult<Job> {
    let importer_name = match update.importer_name.as_deref() {
        Some(name) => Some(required(name, "Importer name")?),
        None => None,
    };
    let status = non_empty(update.status.as_deref());

    let assignee_id = match update.assigned_username.as_deref() {
        Some(username) => Some(resolve_assignee(pool, Some(username)).await?),
        None => None,
    };

    // Write first, for the same reason as in `add_job`
    let mut tx = pool.begin().await?;

    let changes = JobChanges {
        importer_name,
        status,
        assignee_id,
    };
    if !job_queries::update_job(&mut *tx, job_id, &changes, Utc::now()).await? {
        return Err(job_not_found(job_id));
    }

    let job = job_queries::get_job(&mut *tx, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;

    tx.commit().await?;

    info!(job_id, status = %job.status, "Job updated");
    metrics::counter!("jobs_updated_total").increment(1);

    Ok(job)
}

/// Create an account. Only admins may do this.
pub async fn add_user(
    pool: &SqlitePool,
    actor: &User,
    username: &str,
    full_name: Option<&str>,
    password_input: &str,
    role: Role,
) -> AppResult<User> {
    auth::require_role(actor, Role::Admin)?;

    let username = required(username, "Username")?;
    if password_input.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }
    let full_name = non_empty(full_name);

    let password_hash = password::hash_password_blocking(password_input.to_string()).await?;

    let user = match user_queries::insert_user(pool, username, full_name, &password_hash, role, Utc::now()).await
    {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict(format!("Username '{username}' is already taken")));
        }
        Err(e) => return Err(e.into()),
    };

    info!(username, role = %role, created_by = %actor.username, "User created");
    metrics::counter!("users_created_total").increment(1);

    Ok(user)
}

/// All accounts, ordered by username. Admin only.
pub async fn list_users(pool: &SqlitePool, actor: &User) -> AppResult<Vec<User>> {
    auth::require_role(actor, Role::Admin)?;
    Ok(user_queries::list_users(pool).await?)
}

/// Usernames jobs may be assigned to
pub async fn assignable_usernames(pool: &SqlitePool) -> AppResult<Vec<String>> {
    let users = user_queries::list_users(pool).await?;
    Ok(users.into_iter().map(|u| u.username).collect())
}

/// Map a username to a user id. Blank or unknown names resolve to no assignee.
async fn resolve_assignee(pool: &SqlitePool, username: Option<&str>) -> AppResult<Option<i64>> {
    let Some(username) = non_empty(username) else {
        return Ok(None);
    };

    match user_queries::find_by_username(pool, username).await? {
        Some(user) => Ok(Some(user.id)),
        None => {
            warn!(username, "Unknown assignee, leaving job unassigned");
            Ok(None)
        }
    }
}

fn required<'a>(value: &'a str, field: &str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed)
    }
}

fn job_not_found(job_id: i64) -> AppError {
    AppError::NotFound(format!("Job {job_id} not found"))
}
