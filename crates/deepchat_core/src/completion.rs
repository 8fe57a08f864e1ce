//! crates/deepchat_core/src/completion.rs
//!
//! Outcome of a single completion call. The client never propagates a
//! failure as an error; every call collapses to exactly one of these
//! variants, and every variant renders to the text stored as the chat's
//! response.

/// The result of one outbound completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// 200-equivalent response; the extracted (and display-rendered)
    /// message content of the first choice.
    Success(String),
    /// Non-200 response from the provider, with the message pulled from its
    /// structured error body when present.
    ApiError { status: u16, message: String },
    /// The call never completed: timeout, connection failure, or an
    /// unexpected response shape.
    TransportError(String),
}

impl CompletionOutcome {
    /// Renders the outcome to the text shown (and persisted) as the
    /// response for the prompt.
    pub fn into_text(self) -> String {
        match self {
            CompletionOutcome::Success(text) => text,
            CompletionOutcome::ApiError { status, message } => {
                format!("API Error {status}: {message}")
            }
            CompletionOutcome::TransportError(message) => format!("Error: {message}"),
        }
    }
}
