use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use garde::Validate;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::models::forms::LoginForm;
use crate::routes::session::{
    cleared_session_cookie, redirect_with_cookie, session_cookie, session_id_from_headers, with_query,
};
use crate::services::auth;

/// GET /login — embedded sign-in form. Failed attempts come back with an
/// `error` query parameter.
pub async fn login_page() -> Html<&'static str> {
    Html(include_str!("../../static/login.html"))
}

/// POST /login — verify credentials, set the session cookie.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let result = match form.validate() {
        Ok(()) => auth::login(&state.db, &form.username, &form.password, state.session_ttl).await,
        Err(_) => Err(AppError::Auth),
    };

    match result {
        Ok((session, _user)) => redirect_with_cookie(
            "/dashboard",
            session_cookie(&session, state.session_ttl, state.cookie_secure),
        ),
        Err(e) => {
            e.log();
            Redirect::to(&with_query("/login", "error", &e.user_message())).into_response()
        }
    }
}

/// GET /logout — drop the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = session_id_from_headers(&headers) {
        if let Err(e) = auth::logout(&state.db, session_id).await {
            e.log();
        }
    }
    redirect_with_cookie("/login", cleared_session_cookie())
}
