//! services/web/src/web/mod.rs
//!
//! The HTTP surface: router construction, shared page rendering, and the
//! security headers applied to every response.

pub mod auth;
pub mod chat;
pub mod errors;
pub mod flash;
pub mod session;
pub mod state;

use axum::{
    http::{header, HeaderValue, StatusCode},
    middleware as axum_middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tera::Context;
use tower_cookies::{CookieManagerLayer, Cookies};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

use crate::web::state::AppState;

/// Renders a template with the pending flash messages, answering 200.
pub(crate) fn render_page(
    state: &AppState,
    cookies: &Cookies,
    template: &str,
    context: &mut Context,
) -> Response {
    render_page_with_status(state, cookies, template, context, StatusCode::OK)
}

/// Renders a template with the pending flash messages and an explicit
/// status code. A template failure degrades to a bare 500; no internal
/// error text reaches the page.
pub(crate) fn render_page_with_status(
    state: &AppState,
    cookies: &Cookies,
    template: &str,
    context: &mut Context,
    status: StatusCode,
) -> Response {
    context.insert("messages", &flash::take_flashes(cookies));
    match state.tera.render(template, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("failed to render {template}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.").into_response()
        }
    }
}

/// Builds the application router. The binaries and the integration tests
/// both go through here, so they exercise the same middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(chat::home))
        .route("/chat", post(chat::submit_chat))
        .route("/clear", post(chat::clear_chat))
        .route("/register", get(auth::register_page).post(auth::register_submit))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/simulate-505", get(errors::simulate_505))
        .fallback(errors::not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session::load_current_user,
        ))
        .layer(CookieManagerLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self' https://cdn.jsdelivr.net; \
                 style-src 'self' https://cdn.jsdelivr.net; object-src 'none';",
            ),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .with_state(state)
}
