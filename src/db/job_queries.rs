use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, QueryBuilder, Row, Sqlite};

use crate::models::job::{Job, JobFilter};

/// Job columns plus the assignee's username from an explicit join.
const JOB_SELECT: &str = r#"
    SELECT j.id, j.reference, j.importer_name, j.received_at, j.status, j.assignee_id,
           u.username AS assignee_username, j.created_at, j.updated_at
    FROM jobs j
    LEFT JOIN users u ON u.id = j.assignee_id
"#;

fn job_from_row(row: &SqliteRow) -> Result<Job, sqlx::Error> {
    Ok(Job {
        id: row.try_get("id")?,
        reference: row.try_get("reference")?,
        importer_name: row.try_get("importer_name")?,
        received_at: row.try_get("received_at")?,
        status: row.try_get("status")?,
        assignee_id: row.try_get("assignee_id")?,
        assignee_username: row.try_get("assignee_username")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Column values for a new job row.
#[derive(Debug)]
pub struct JobRow<'a> {
    pub reference: &'a str,
    pub importer_name: &'a str,
    pub received_at: DateTime<Utc>,
    pub status: &'a str,
    pub assignee_id: Option<i64>,
}

/// Insert a job and return its id. A duplicate reference surfaces as a
/// unique violation from the database at commit time.
pub async fn insert_job<'e, E>(executor: E, job: &JobRow<'_>, now: DateTime<Utc>) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        INSERT INTO jobs (reference, importer_name, received_at, status, assignee_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(job.reference)
    .bind(job.importer_name)
    .bind(job.received_at)
    .bind(job.status)
    .bind(job.assignee_id)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;

    row.try_get("id")
}

/// Get a job by id
pub async fn get_job<'e, E>(executor: E, job_id: i64) -> Result<Option<Job>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(&format!("{JOB_SELECT} WHERE j.id = ?"))
        .bind(job_id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(job_from_row).transpose()
}

/// Field changes for a job. `None` keeps the stored value; for the
/// assignee, `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct JobChanges<'a> {
    pub importer_name: Option<&'a str>,
    pub status: Option<&'a str>,
    pub assignee_id: Option<Option<i64>>,
}

/// Apply changes in a single statement. Returns false if no row matched.
pub async fn update_job<'e, E>(
    executor: E,
    job_id: i64,
    changes: &JobChanges<'_>,
    updated_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE jobs
        SET importer_name = COALESCE(?, importer_name),
            status = COALESCE(?, status),
            assignee_id = CASE WHEN ? THEN ? ELSE assignee_id END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.importer_name)
    .bind(changes.status)
    .bind(changes.assignee_id.is_some())
    .bind(changes.assignee_id.flatten())
    .bind(updated_at)
    .bind(job_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List jobs matching every supplied filter, newest first.
pub async fn list_jobs<'e, E>(executor: E, filter: &JobFilter) -> Result<Vec<Job>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(JOB_SELECT);
    builder.push(" WHERE 1 = 1");

    if let Some(status) = filter.status() {
        builder.push(" AND j.status = ").push_bind(status.to_string());
    }

    if let Some(username) = filter.assigned_username() {
        builder.push(" AND u.username = ").push_bind(username.to_string());
    }

    if let Some(text) = filter.search_text() {
        // SQLite lower() folds ASCII only; fold the needle the same way
        let needle = text.to_ascii_lowercase();
        builder
            .push(" AND (instr(lower(j.reference), ")
            .push_bind(needle.clone())
            .push(") > 0 OR instr(lower(j.importer_name), ")
            .push_bind(needle)
            .push(") > 0)");
    }

    builder.push(" ORDER BY j.created_at DESC, j.id DESC");

    let rows = builder.build().fetch_all(executor).await?;
    rows.iter().map(job_from_row).collect()
}

/// Count all jobs (used by tests and health reporting)
pub async fn count_jobs<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT COUNT(*) AS total FROM jobs")
        .fetch_one(executor)
        .await?;
    row.try_get("total")
}
