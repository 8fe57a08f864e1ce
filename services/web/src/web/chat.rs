//! services/web/src/web/chat.rs
//!
//! The chat routes: home page (conversation history), prompt submission,
//! and history clearing. Whatever the completion call produces — model
//! text, a provider error, or a transport failure — the rendered text is
//! persisted as the response paired with the original prompt.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;
use tracing::error;

use crate::web::flash::flash;
use crate::web::render_page;
use crate::web::session::CurrentUser;
use crate::web::state::AppState;
use deepchat_core::validate::ValidatedPrompt;

#[derive(Serialize)]
struct Exchange {
    prompt: String,
    response: String,
}

#[derive(Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub prompt: String,
}

/// GET /
pub async fn home(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<Option<CurrentUser>>,
    cookies: Cookies,
) -> Response {
    let Some(CurrentUser(user)) = current_user else {
        return Redirect::to("/login").into_response();
    };

    let conversation = match state.conversations.list_for_user(user.id).await {
        Ok(chats) => chats
            .into_iter()
            .map(|chat| Exchange {
                prompt: chat.prompt,
                response: chat.response,
            })
            .collect::<Vec<_>>(),
        Err(e) => {
            error!("failed to load conversation: {e}");
            flash(&cookies, "error", "Something went wrong.");
            Vec::new()
        }
    };

    let mut context = Context::new();
    context.insert("username", &user.username);
    context.insert("conversation", &conversation);
    render_page(&state, &cookies, "index.html", &mut context)
}

/// POST /chat
pub async fn submit_chat(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<Option<CurrentUser>>,
    cookies: Cookies,
    Form(form): Form<ChatForm>,
) -> Response {
    let Some(CurrentUser(user)) = current_user else {
        return Redirect::to("/login").into_response();
    };

    // Validation failures never reach the completion client and never
    // create a row.
    let prompt = match ValidatedPrompt::parse(&form.prompt) {
        Ok(prompt) => prompt,
        Err(e) => {
            flash(&cookies, "error", &e.to_string());
            return Redirect::to("/").into_response();
        }
    };

    let outcome = state.completion.complete(&prompt).await;
    let response_text = outcome.into_text();

    if let Err(e) = state
        .conversations
        .append(user.id, prompt.as_str(), &response_text)
        .await
    {
        error!("failed to persist chat: {e}");
        flash(&cookies, "error", "Something went wrong.");
    }

    Redirect::to("/").into_response()
}

/// POST /clear
pub async fn clear_chat(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<Option<CurrentUser>>,
    cookies: Cookies,
) -> Response {
    let Some(CurrentUser(user)) = current_user else {
        return Redirect::to("/login").into_response();
    };

    match state.conversations.clear_for_user(user.id).await {
        Ok(()) => flash(&cookies, "success", "Chat history cleared"),
        Err(e) => {
            error!("failed to clear chat history: {e}");
            flash(&cookies, "error", "Something went wrong.");
        }
    }

    Redirect::to("/").into_response()
}
