//! crates/deepchat_core/src/ports.rs
//!
//! Service contracts (traits) for the application core. These traits are the
//! boundary of the hexagonal architecture: the web layer and the tests only
//! ever talk to these, never to sqlx or reqwest directly.

use async_trait::async_trait;

use crate::completion::CompletionOutcome;
use crate::domain::{AuthSession, Chat, User};
use crate::password::PasswordHash;
use crate::validate::ValidatedPrompt;

/// Error type shared by all store ports.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Registration with a username that already exists. Checked before any
    /// write; a racing insert hitting the unique constraint maps here too.
    #[error("User already exists.")]
    DuplicateUsername,
    /// Login rejection. Deliberately identical for unknown-user and
    /// wrong-password so usernames cannot be enumerated.
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A store-layer write failed; nothing was partially written.
    #[error("Persistence failure: {0}")]
    Persistence(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// Convenience alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Owns hashed-password storage and verification for users.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Creates a new user. Fails with [`PortError::DuplicateUsername`] if
    /// the username is taken (case-sensitive exact match), without writing
    /// anything.
    async fn register(&self, username: &str, password: PasswordHash) -> PortResult<User>;

    /// Looks the user up by exact username and checks the plaintext against
    /// the stored hash. Any failure is [`PortError::InvalidCredentials`].
    async fn verify(&self, username: &str, plaintext_password: &str) -> PortResult<User>;

    /// Deletes a user and, in the same transaction, every chat and session
    /// they own. Not exposed as a route; keeps the cascade correct if one
    /// is added.
    async fn delete_user(&self, user_id: i64) -> PortResult<()>;
}

/// Binds an authenticated identity to a transport-level session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Establishes a session for a user, capturing the client fingerprint
    /// at login time.
    async fn create_session(&self, user_id: i64, fingerprint: &str) -> PortResult<AuthSession>;

    /// Resolves a session id to its user, re-checking the fingerprint
    /// against the current request. A mismatched fingerprint deletes the
    /// session and reports [`PortError::NotFound`], as does an expired or
    /// unknown session.
    async fn validate_session(&self, session_id: &str, fingerprint: &str) -> PortResult<User>;

    /// Drops a session. Unknown ids succeed silently.
    async fn delete_session(&self, session_id: &str) -> PortResult<()>;
}

/// Owns ordered per-user prompt/response history.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persists one exchange with timestamp = now (UTC). A failed write is
    /// all-or-nothing.
    async fn append(&self, user_id: i64, prompt: &str, response: &str) -> PortResult<Chat>;

    /// The user's chats in ascending timestamp order; never another user's
    /// rows.
    async fn list_for_user(&self, user_id: i64) -> PortResult<Vec<Chat>>;

    /// Atomically deletes all of the user's chats. Idempotent.
    async fn clear_for_user(&self, user_id: i64) -> PortResult<()>;
}

/// Adapter over the external chat-completions API.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one single-turn request. Infallible by contract: timeouts,
    /// bad responses, and provider errors all come back as an outcome
    /// variant, never as a panic or error.
    async fn complete(&self, prompt: &ValidatedPrompt) -> CompletionOutcome;
}
