//! services/web/src/web/auth.rs
//!
//! Registration, login, and logout routes. All outcomes degrade to a flash
//! message plus a redirect; credential failures share one generic message
//! so usernames cannot be enumerated.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;
use tracing::error;

use crate::web::flash::flash;
use crate::web::render_page;
use crate::web::session::{self, CurrentUser};
use crate::web::state::AppState;
use deepchat_core::password::PasswordHash;
use deepchat_core::ports::PortError;
use deepchat_core::validate::{validate_password, validate_username};

#[derive(Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /register
pub async fn register_page(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Response {
    render_page(&state, &cookies, "register.html", &mut Context::new())
}

/// POST /register
pub async fn register_submit(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    headers: HeaderMap,
    Form(form): Form<AuthForm>,
) -> Response {
    for check in [
        validate_username(&form.username),
        validate_password(&form.password),
    ] {
        if let Err(e) = check {
            flash(&cookies, "error", &e.to_string());
            return Redirect::to("/register").into_response();
        }
    }

    let password = match PasswordHash::new(&form.password) {
        Ok(password) => password,
        Err(e) => {
            error!("failed to hash password: {e}");
            flash(&cookies, "error", "Something went wrong during registration.");
            return Redirect::to("/register").into_response();
        }
    };

    let user = match state.credentials.register(&form.username, password).await {
        Ok(user) => user,
        Err(PortError::DuplicateUsername) => {
            flash(&cookies, "error", "User already exists.");
            return Redirect::to("/register").into_response();
        }
        Err(e) => {
            error!("failed to create user: {e}");
            flash(&cookies, "error", "Something went wrong during registration.");
            return Redirect::to("/register").into_response();
        }
    };

    let print = session::fingerprint(&headers);
    if let Err(e) = session::establish_session(&state, &cookies, user.id, &print).await {
        error!("failed to create auth session: {e}");
        flash(&cookies, "error", "Something went wrong during registration.");
        return Redirect::to("/login").into_response();
    }

    flash(&cookies, "success", "Account created successfully");
    Redirect::to("/").into_response()
}

/// GET /login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<Option<CurrentUser>>,
    cookies: Cookies,
) -> Response {
    if current_user.is_some() {
        return Redirect::to("/").into_response();
    }
    render_page(&state, &cookies, "login.html", &mut Context::new())
}

/// POST /login
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<Option<CurrentUser>>,
    cookies: Cookies,
    headers: HeaderMap,
    Form(form): Form<AuthForm>,
) -> Response {
    if current_user.is_some() {
        return Redirect::to("/").into_response();
    }

    for check in [
        validate_username(&form.username),
        validate_password(&form.password),
    ] {
        if let Err(e) = check {
            flash(&cookies, "error", &e.to_string());
            return Redirect::to("/login").into_response();
        }
    }

    let user = match state.credentials.verify(&form.username, &form.password).await {
        Ok(user) => user,
        Err(_) => {
            // One message for unknown user and wrong password alike.
            flash(&cookies, "error", "Invalid username or password");
            return Redirect::to("/login").into_response();
        }
    };

    let print = session::fingerprint(&headers);
    if let Err(e) = session::establish_session(&state, &cookies, user.id, &print).await {
        error!("failed to create auth session: {e}");
        flash(&cookies, "error", "Something went wrong.");
        return Redirect::to("/login").into_response();
    }

    flash(&cookies, "success", "Logged in successfully");
    Redirect::to("/").into_response()
}

/// GET /logout
pub async fn logout(State(state): State<Arc<AppState>>, cookies: Cookies) -> Response {
    session::clear_session(&state, &cookies).await;
    flash(&cookies, "info", "You've been logged out");
    Redirect::to("/login").into_response()
}
