//! Form surface for the job registry. Views are JSON; form posts redirect
//! back with a `message` or `error` query parameter.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::models::forms::{AddJobRequest, UpdateJobRequest};
use crate::models::job::{non_empty, Job, JobFilter, SUGGESTED_STATUSES};
use crate::models::user::User;
use crate::routes::session::{with_query, PageUser};
use crate::services::registry;

/// One-shot notice carried across a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub user: User,
    pub filters: JobFilter,
    pub jobs: Vec<Job>,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobFormView {
    pub user: User,
    pub job: Option<Job>,
    pub assignable_users: Vec<String>,
    pub suggested_statuses: &'static [&'static str],
    pub error: Option<String>,
}

/// Redirect back to a form with the error shown to the user.
pub(crate) fn back_with_error(path: &str, err: AppError) -> Response {
    err.log();
    Redirect::to(&with_query(path, "error", &err.user_message())).into_response()
}

pub(crate) fn forward_with_message(path: &str, message: &str) -> Response {
    Redirect::to(&with_query(path, "message", message)).into_response()
}

/// GET /dashboard?status=&allocated=&q=
pub async fn dashboard(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Query(filters): Query<JobFilter>,
    Query(flash): Query<FlashQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let jobs = registry::list_jobs(&state.db, &filters).await?;

    Ok(Json(DashboardView {
        user,
        filters,
        jobs,
        message: flash.message,
        error: flash.error,
    }))
}

/// GET /jobs/add
pub async fn add_job_form(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Query(flash): Query<FlashQuery>,
) -> Result<Json<JobFormView>, AppError> {
    Ok(Json(JobFormView {
        user,
        job: None,
        assignable_users: registry::assignable_usernames(&state.db).await?,
        suggested_statuses: SUGGESTED_STATUSES,
        error: flash.error,
    }))
}

/// POST /jobs/add
pub async fn add_job(
    State(state): State<AppState>,
    PageUser(_user): PageUser,
    Form(form): Form<AddJobRequest>,
) -> Response {
    if let Err(report) = form.validate() {
        return back_with_error("/jobs/add", report.into());
    }

    let requested_assignee = non_empty(form.assigned_username.as_deref()).map(str::to_string);

    match registry::add_job(&state.db, form.into()).await {
        Ok(job) => {
            let mut message = format!("Job {} added", job.reference);
            if let Some(requested) = requested_assignee {
                if job.assignee_username.is_none() {
                    message.push_str(&format!("; unknown user '{requested}', job left unassigned"));
                }
            }
            forward_with_message("/dashboard", &message)
        }
        Err(e) => back_with_error("/jobs/add", e),
    }
}

/// GET /jobs/{id}/edit
pub async fn edit_job_form(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Path(job_id): Path<i64>,
    Query(flash): Query<FlashQuery>,
) -> Response {
    let job = match registry::get_job(&state.db, job_id).await {
        Ok(job) => job,
        Err(e) => return back_with_error("/dashboard", e),
    };

    match registry::assignable_usernames(&state.db).await {
        Ok(assignable_users) => Json(JobFormView {
            user,
            job: Some(job),
            assignable_users,
            suggested_statuses: SUGGESTED_STATUSES,
            error: flash.error,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /jobs/{id}/edit
pub async fn edit_job(
    State(state): State<AppState>,
    PageUser(_user): PageUser,
    Path(job_id): Path<i64>,
    Form(form): Form<UpdateJobRequest>,
) -> Response {
    let form_path = format!("/jobs/{job_id}/edit");

    if let Err(report) = form.validate() {
        return back_with_error(&form_path, report.into());
    }

    match registry::update_job(&state.db, job_id, form.into()).await {
        Ok(job) => forward_with_message("/dashboard", &format!("Job {} updated", job.reference)),
        Err(e @ AppError::NotFound(_)) => back_with_error("/dashboard", e),
        Err(e) => back_with_error(&form_path, e),
    }
}
