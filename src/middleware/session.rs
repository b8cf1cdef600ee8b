use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use tracing::debug;

use crate::error::DeskError;
use crate::server::router::DeskState;
use crate::service::session::SessionUser;

pub const SESSION_COOKIE: &str = "staffdesk_session";

/// Extracts the logged-in user from the encrypted session cookie.
/// Rejects with 401 when the cookie is missing or cannot be decrypted.
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionUser);

impl FromRequestParts<DeskState> for RequireSession {
    type Rejection = DeskError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DeskState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key().clone());
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(DeskError::Unauthorized);
        };
        match serde_json::from_str::<SessionUser>(cookie.value()) {
            Ok(session) => Ok(Self(session)),
            Err(e) => {
                debug!(error = %e, "session cookie payload rejected");
                Err(DeskError::Unauthorized)
            }
        }
    }
}

pub fn store_session(
    jar: PrivateCookieJar,
    session: &SessionUser,
    insecure: bool,
) -> Result<PrivateCookieJar, DeskError> {
    let value = serde_json::to_string(session)?;
    Ok(jar.add(build_cookie(value, insecure)))
}

pub fn clear_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(Cookie::new(SESSION_COOKIE, "")).path("/").build())
}

// No max-age: the session lasts as long as the browser keeps the cookie.
fn build_cookie(value: String, insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .build()
}
