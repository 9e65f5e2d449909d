//! Session cookie handling and the logged-in user extractors.

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Duration;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::models::session::Session;
use crate::models::user::User;
use crate::services::auth;

pub const SESSION_COOKIE: &str = "session_id";

/// Extract the session id from the `Cookie` header, if present and well formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(session: &Session, ttl: Duration, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        session.id,
        ttl.num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    // Only ASCII from a UUID and fixed attributes
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// `Set-Cookie` value removing the session cookie.
pub fn cleared_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session_id=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Redirect that also sets a cookie
pub fn redirect_with_cookie(to: &str, cookie: HeaderValue) -> Response {
    let mut response = Redirect::to(to).into_response();
    response.headers_mut().insert(SET_COOKIE, cookie);
    response
}

async fn user_from_parts(parts: &Parts, state: &AppState) -> Result<Option<User>, AppError> {
    match session_id_from_headers(&parts.headers) {
        Some(session_id) => auth::resolve_session(&state.db, session_id).await,
        None => Ok(None),
    }
}

/// Logged-in user for JSON endpoints. Rejects with 401 JSON.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        user_from_parts(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Logged-in user for form pages. Redirects to the login page instead.
#[derive(Debug, Clone)]
pub struct PageUser(pub User);

impl FromRequestParts<AppState> for PageUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match user_from_parts(parts, state).await {
            Ok(Some(user)) => Ok(PageUser(user)),
            Ok(None) => Err(Redirect::to("/login").into_response()),
            Err(e) => {
                e.log();
                Err(Redirect::to(&with_query("/login", "error", &e.user_message())).into_response())
            }
        }
    }
}

/// Append a single percent-encoded query parameter to a path.
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{key}={}", urlencoding::encode(value))
}
