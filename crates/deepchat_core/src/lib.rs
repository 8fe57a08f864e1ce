pub mod completion;
pub mod domain;
pub mod password;
pub mod ports;
pub mod validate;

pub use completion::CompletionOutcome;
pub use domain::{AuthSession, Chat, User, UserCredentials};
pub use password::PasswordHash;
pub use ports::{
    CompletionService, ConversationStore, CredentialStore, PortError, PortResult, SessionStore,
};
pub use validate::{ValidatedPrompt, ValidationError};
