//! crates/deepchat_core/src/validate.rs
//!
//! Input shape validation for credentials and chat prompts. Validation
//! failures are user-recoverable; their `Display` strings are the messages
//! flashed back at the form.

/// Rejection of user input that fails shape validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a message")]
    EmptyPrompt,
    #[error("Prompt too long.")]
    PromptTooLong,
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Username must be between 3 and 80 characters")]
    UsernameLength,
    #[error("Password cannot be empty")]
    EmptyPassword,
    #[error("Password must be at most 128 characters")]
    PasswordLength,
}

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 80;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_PROMPT_LEN: usize = 1000;

/// Checks a submitted username: non-blank after trimming, 3..=80 characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(ValidationError::UsernameLength);
    }
    Ok(())
}

/// Checks a submitted password: non-blank after trimming, at most 128 characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(ValidationError::PasswordLength);
    }
    Ok(())
}

/// A chat prompt that passed validation.
///
/// Trimming is only used for the emptiness check; the stored value is the
/// submitted text verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPrompt(String);

impl ValidatedPrompt {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.chars().count() > MAX_PROMPT_LEN {
            return Err(ValidationError::PromptTooLong);
        }
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidatedPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prompt_is_rejected() {
        assert_eq!(
            ValidatedPrompt::parse(""),
            Err(ValidationError::EmptyPrompt)
        );
    }

    #[test]
    fn whitespace_only_prompt_is_rejected() {
        assert_eq!(
            ValidatedPrompt::parse("   \n\t "),
            Err(ValidationError::EmptyPrompt)
        );
    }

    #[test]
    fn prompt_at_limit_is_accepted() {
        let raw = "a".repeat(MAX_PROMPT_LEN);
        assert!(ValidatedPrompt::parse(&raw).is_ok());
    }

    #[test]
    fn prompt_over_limit_is_rejected() {
        let raw = "a".repeat(MAX_PROMPT_LEN + 1);
        assert_eq!(
            ValidatedPrompt::parse(&raw),
            Err(ValidationError::PromptTooLong)
        );
    }

    #[test]
    fn prompt_keeps_original_untrimmed_text() {
        let prompt = ValidatedPrompt::parse("  Hello  ").unwrap();
        assert_eq!(prompt.as_str(), "  Hello  ");
    }

    #[test]
    fn username_bounds() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LEN)).is_ok());
        assert_eq!(
            validate_username("ab"),
            Err(ValidationError::UsernameLength)
        );
        assert_eq!(
            validate_username(&"a".repeat(MAX_USERNAME_LEN + 1)),
            Err(ValidationError::UsernameLength)
        );
        assert_eq!(validate_username("   "), Err(ValidationError::EmptyUsername));
    }

    #[test]
    fn password_bounds() {
        assert!(validate_password("pw1").is_ok());
        assert_eq!(validate_password(" "), Err(ValidationError::EmptyPassword));
        assert_eq!(
            validate_password(&"p".repeat(MAX_PASSWORD_LEN + 1)),
            Err(ValidationError::PasswordLength)
        );
    }

    #[test]
    fn validation_messages_match_flash_texts() {
        assert_eq!(
            ValidationError::EmptyPrompt.to_string(),
            "Please enter a message"
        );
        assert_eq!(ValidationError::PromptTooLong.to_string(), "Prompt too long.");
    }
}
