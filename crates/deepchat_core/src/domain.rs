//! crates/deepchat_core/src/domain.rs
//!
//! Pure data structures for the chat application, independent of any
//! database or serialization format.

use chrono::{DateTime, Utc};

use crate::password::PasswordHash;

/// A registered user, as seen by the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// A user together with their stored password hash.
///
/// Only the login/registration flows ever see this; everything past the
/// credential check works with [`User`].
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub password_hash: PasswordHash,
}

impl UserCredentials {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
        }
    }
}

/// One prompt/response exchange owned by a user.
///
/// `timestamp` is assigned at write time and is the sole ordering key for a
/// user's conversation.
#[derive(Debug, Clone)]
pub struct Chat {
    pub id: i64,
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub response: String,
}

/// A browser login session backing the session cookie.
///
/// `fingerprint` is the client fingerprint captured at login time; requests
/// whose fingerprint no longer matches invalidate the session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: i64,
    pub fingerprint: String,
    pub expires_at: DateTime<Utc>,
}
