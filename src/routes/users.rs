use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use garde::Validate;
use serde::Serialize;
use std::str::FromStr;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::models::forms::AddUserRequest;
use crate::models::job::non_empty;
use crate::models::user::{Role, User};
use crate::routes::jobs::{back_with_error, forward_with_message, FlashQuery};
use crate::routes::session::PageUser;
use crate::services::{auth, registry};

#[derive(Debug, Serialize)]
pub struct UsersView {
    pub user: User,
    pub users: Vec<User>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Parse an optional role field; blank means staff.
pub(crate) fn parse_role(role: Option<&str>) -> Result<Role, AppError> {
    match non_empty(role) {
        Some(value) => Role::from_str(value)
            .map_err(|_| AppError::Validation(format!("Unknown role '{value}'"))),
        None => Ok(Role::Staff),
    }
}

/// GET /users — admin only. Others are sent back to the dashboard.
pub async fn list_users(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Query(flash): Query<FlashQuery>,
) -> Response {
    match registry::list_users(&state.db, &user).await {
        Ok(users) => Json(UsersView {
            user,
            users,
            message: flash.message,
            error: flash.error,
        })
        .into_response(),
        Err(e @ AppError::Forbidden) => back_with_error("/dashboard", e),
        Err(e) => e.into_response(),
    }
}

/// POST /users/add — admin only.
pub async fn add_user(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Form(form): Form<AddUserRequest>,
) -> Response {
    if let Err(e) = auth::require_role(&user, Role::Admin) {
        return back_with_error("/dashboard", e);
    }

    if let Err(report) = form.validate() {
        return back_with_error("/users", report.into());
    }

    let role = match parse_role(form.role.as_deref()) {
        Ok(role) => role,
        Err(e) => return back_with_error("/users", e),
    };

    match registry::add_user(
        &state.db,
        &user,
        &form.username,
        form.full_name.as_deref(),
        &form.password,
        role,
    )
    .await
    {
        Ok(created) => forward_with_message("/users", &format!("User {} created", created.username)),
        Err(e @ AppError::Forbidden) => back_with_error("/dashboard", e),
        Err(e) => back_with_error("/users", e),
    }
}
