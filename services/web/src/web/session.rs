//! services/web/src/web/session.rs
//!
//! The session guard. A login binds a server-side session row to the
//! client fingerprint (its User-Agent) captured at that moment; every
//! later request recomputes the fingerprint and a mismatch invalidates
//! the session before the request reaches anything protected. The request
//! then proceeds as anonymous.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};
use tracing::error;

use crate::web::state::AppState;
use deepchat_core::domain::User;
use deepchat_core::ports::PortResult;

const SESSION_COOKIE: &str = "deepchat_session";

/// The authenticated user for this request, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Derives the client fingerprint from request transport metadata.
///
/// Coarse on purpose: the User-Agent string is enough to catch a stolen
/// cookie replayed from a different client.
pub fn fingerprint(headers: &axum::http::HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(tower_cookies::cookie::SameSite::Lax)
        .build()
}

/// Creates a session row for the user and sets the session cookie.
pub async fn establish_session(
    state: &AppState,
    cookies: &Cookies,
    user_id: i64,
    fingerprint: &str,
) -> PortResult<()> {
    let session = state.sessions.create_session(user_id, fingerprint).await?;
    cookies.add(session_cookie(session.id));
    Ok(())
}

/// Drops the current session row (if any) and clears the cookie.
pub async fn clear_session(state: &AppState, cookies: &Cookies) {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        let session_id = cookie.value().to_string();
        if let Err(e) = state.sessions.delete_session(&session_id).await {
            error!("failed to delete auth session: {e}");
        }
    }
    cookies.remove(session_cookie(String::new()));
}

/// Middleware run on every route: resolves the session cookie to a user,
/// re-checking the fingerprint against the current request.
///
/// Inserts `Option<CurrentUser>` into request extensions. A missing,
/// expired, or fingerprint-mismatched session leaves the request anonymous;
/// the mismatch case has already deleted the session row by the time the
/// handler runs.
pub async fn load_current_user(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let current = match cookies.get(SESSION_COOKIE) {
        Some(cookie) => {
            let session_id = cookie.value().to_string();
            let print = fingerprint(req.headers());
            match state.sessions.validate_session(&session_id, &print).await {
                Ok(user) => Some(CurrentUser(user)),
                Err(_) => {
                    cookies.remove(session_cookie(String::new()));
                    None
                }
            }
        }
        None => None,
    };

    req.extensions_mut().insert(current);
    next.run(req).await
}
