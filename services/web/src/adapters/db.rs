//! services/web/src/adapters/db.rs
//!
//! The database adapter: concrete implementation of the `CredentialStore`,
//! `SessionStore`, and `ConversationStore` ports over SQLite via `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use deepchat_core::domain::{AuthSession, Chat, User, UserCredentials};
use deepchat_core::password::PasswordHash;
use deepchat_core::ports::{
    ConversationStore, CredentialStore, PortError, PortResult, SessionStore,
};

/// How long a login session stays valid.
const SESSION_TTL_DAYS: i64 = 30;

/// A database adapter implementing the three store ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Runs database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct CredentialsRecord {
    id: i64,
    username: String,
    password_hash: String,
}

impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            username: self.username,
            password_hash: PasswordHash::from_stored(self.password_hash),
        }
    }
}

#[derive(FromRow)]
struct ChatRecord {
    id: i64,
    user_id: i64,
    timestamp: DateTime<Utc>,
    prompt: String,
    response: String,
}

impl ChatRecord {
    fn to_domain(self) -> Chat {
        Chat {
            id: self.id,
            user_id: self.user_id,
            timestamp: self.timestamp,
            prompt: self.prompt,
            response: self.response,
        }
    }
}

#[derive(FromRow)]
struct SessionRecord {
    user_id: i64,
    fingerprint: String,
    expires_at: DateTime<Utc>,
    username: String,
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation))
        .unwrap_or(false)
}

//=========================================================================================
// `CredentialStore` Implementation
//=========================================================================================

#[async_trait]
impl CredentialStore for DbAdapter {
    async fn register(&self, username: &str, password: PasswordHash) -> PortResult<User> {
        // Reject before any write. The unique constraint below still backs
        // this up if two registrations race.
        let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;
        if existing.is_some() {
            return Err(PortError::DuplicateUsername);
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, password_hash) VALUES (?, ?) RETURNING id",
        )
        .bind(username)
        .bind(password.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::DuplicateUsername
            } else {
                PortError::Persistence(e.to_string())
            }
        })?;

        Ok(User {
            id,
            username: username.to_string(),
        })
    }

    async fn verify(&self, username: &str, plaintext_password: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        // A missing user and a wrong password collapse into the same error.
        let creds = record.map(CredentialsRecord::to_domain);
        match creds {
            Some(creds) if creds.password_hash.verify(plaintext_password) => {
                Ok(creds.into_user())
            }
            _ => Err(PortError::InvalidCredentials),
        }
    }

    async fn delete_user(&self, user_id: i64) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query("DELETE FROM auth_sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        sqlx::query("DELETE FROM chats WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))
    }
}

//=========================================================================================
// `SessionStore` Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for DbAdapter {
    async fn create_session(&self, user_id: i64, fingerprint: &str) -> PortResult<AuthSession> {
        let session = AuthSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            fingerprint: fingerprint.to_string(),
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        };

        sqlx::query(
            "INSERT INTO auth_sessions (id, user_id, fingerprint, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(&session.fingerprint)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(session)
    }

    async fn validate_session(&self, session_id: &str, fingerprint: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "SELECT s.user_id, s.fingerprint, s.expires_at, u.username \
             FROM auth_sessions s JOIN users u ON u.id = s.user_id \
             WHERE s.id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some(record) = record else {
            return Err(PortError::NotFound("session".to_string()));
        };

        if record.expires_at <= Utc::now() {
            self.delete_session(session_id).await?;
            return Err(PortError::NotFound("session expired".to_string()));
        }

        if record.fingerprint != fingerprint {
            // Silent forced logout: the session is gone before the request
            // reaches anything protected.
            warn!(user_id = record.user_id, "session fingerprint mismatch, invalidating session");
            self.delete_session(session_id).await?;
            return Err(PortError::NotFound("session fingerprint mismatch".to_string()));
        }

        Ok(User {
            id: record.user_id,
            username: record.username,
        })
    }

    async fn delete_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        Ok(())
    }
}

//=========================================================================================
// `ConversationStore` Implementation
//=========================================================================================

#[async_trait]
impl ConversationStore for DbAdapter {
    async fn append(&self, user_id: i64, prompt: &str, response: &str) -> PortResult<Chat> {
        let timestamp = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO chats (user_id, timestamp, prompt, response) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(user_id)
        .bind(timestamp)
        .bind(prompt)
        .bind(response)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(Chat {
            id,
            user_id,
            timestamp,
            prompt: prompt.to_string(),
            response: response.to_string(),
        })
    }

    async fn list_for_user(&self, user_id: i64) -> PortResult<Vec<Chat>> {
        let records = sqlx::query_as::<_, ChatRecord>(
            "SELECT id, user_id, timestamp, prompt, response FROM chats \
             WHERE user_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(ChatRecord::to_domain).collect())
    }

    async fn clear_for_user(&self, user_id: i64) -> PortResult<()> {
        // One DELETE statement, so readers see the full prior set or nothing.
        sqlx::query("DELETE FROM chats WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        Ok(())
    }
}
