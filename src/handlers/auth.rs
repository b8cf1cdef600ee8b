use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::error::DeskError;
use crate::middleware::session::{RequireSession, clear_session, store_session};
use crate::server::router::DeskState;

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/register -> 201 with the stored (trimmed) username, or 409 if it is taken.
pub async fn register_handler(
    State(state): State<DeskState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<impl IntoResponse, DeskError> {
    let Json(body) = body?;
    let username = state.desk.register(&body.username, &body.password).await?;
    Ok((StatusCode::CREATED, Json(json!({ "username": username }))))
}

/// POST /auth/login -> sets the session cookie.
pub async fn login_handler(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<impl IntoResponse, DeskError> {
    let Json(body) = body?;
    let session = state.desk.login(&body.username, &body.password).await?;
    let jar = store_session(jar, &session, state.insecure_cookie)?;
    Ok((jar, Json(session)))
}

/// POST /auth/logout
pub async fn logout_handler(jar: PrivateCookieJar) -> impl IntoResponse {
    (clear_session(jar), StatusCode::NO_CONTENT)
}

/// GET /me -> the current session.
pub async fn me_handler(RequireSession(session): RequireSession) -> impl IntoResponse {
    Json(session)
}
