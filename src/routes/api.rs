//! JSON API over the same registry. Errors come back as
//! `{"error": kind, "message": text}` with a matching status code.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::models::forms::{AddJobRequest, AddUserRequest, UpdateJobRequest};
use crate::models::job::{Job, JobFilter};
use crate::models::user::{Role, User};
use crate::routes::session::CurrentUser;
use crate::routes::users::parse_role;
use crate::services::{auth, registry};

/// GET /api/v1/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(registry::list_jobs(&state.db, &filter).await?))
}

/// POST /api/v1/jobs
pub async fn create_job(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(body): Json<AddJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    body.validate()?;
    let job = registry::add_job(&state.db, body.into()).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(job_id): Path<i64>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(registry::get_job(&state.db, job_id).await?))
}

/// PATCH /api/v1/jobs/{id}
pub async fn update_job(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(job_id): Path<i64>,
    Json(body): Json<UpdateJobRequest>,
) -> Result<Json<Job>, AppError> {
    body.validate()?;
    Ok(Json(registry::update_job(&state.db, job_id, body.into()).await?))
}

/// GET /api/v1/users — admin only
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(registry::list_users(&state.db, &user).await?))
}

/// POST /api/v1/users — admin only
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    auth::require_role(&user, Role::Admin)?;
    body.validate()?;
    let role = parse_role(body.role.as_deref())?;
    let created = registry::add_user(
        &state.db,
        &user,
        &body.username,
        body.full_name.as_deref(),
        &body.password,
        role,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
