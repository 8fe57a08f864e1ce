//! services/web/src/web/errors.rs
//!
//! Rendered error pages: the 404 fallback and a diagnostic route that
//! deliberately answers 505 so the failure path stays testable.

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;

use crate::web::render_page_with_status;
use crate::web::state::AppState;

/// Fallback for unknown routes.
pub async fn not_found(State(state): State<Arc<AppState>>, cookies: Cookies) -> Response {
    render_page_with_status(
        &state,
        &cookies,
        "errors/404.html",
        &mut Context::new(),
        StatusCode::NOT_FOUND,
    )
}

/// GET /simulate-505
pub async fn simulate_505(State(state): State<Arc<AppState>>, cookies: Cookies) -> Response {
    render_page_with_status(
        &state,
        &cookies,
        "errors/505.html",
        &mut Context::new(),
        StatusCode::HTTP_VERSION_NOT_SUPPORTED,
    )
}
