//! services/web/src/web/state.rs
//!
//! The shared application state, created once at startup and passed into
//! every handler. Stores and the completion client are held as trait
//! objects so tests can substitute their own implementations.

use std::sync::Arc;

use tera::Tera;

use crate::config::Config;
use deepchat_core::ports::{
    CompletionService, ConversationStore, CredentialStore, SessionStore,
};

/// Shared application state. No ambient globals: everything a handler
/// needs is reachable from here.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub conversations: Arc<dyn ConversationStore>,
    pub completion: Arc<dyn CompletionService>,
    pub tera: Tera,
    pub config: Arc<Config>,
}

/// Loads the page templates.
///
/// Templates are compiled into the binary so the server does not depend on
/// a templates directory at its working path.
pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("index.html", include_str!("../../templates/index.html")),
        ("login.html", include_str!("../../templates/login.html")),
        ("register.html", include_str!("../../templates/register.html")),
        ("errors/404.html", include_str!("../../templates/errors/404.html")),
        ("errors/505.html", include_str!("../../templates/errors/505.html")),
    ])?;
    Ok(tera)
}
