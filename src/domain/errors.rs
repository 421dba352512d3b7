//! Domain errors for the XP ledger.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur while scoring problems and moving XP.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Problem not found: {0}")]
    ProblemNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Problem {0} is already finalized")]
    AlreadyFinalized(String),

    #[error("Problem {0} is not finalized")]
    NotFinalized(String),

    #[error("Problem {0} is finalized; unfinalize it before recording attempts")]
    ProblemFinalized(String),

    #[error("Problem source error: {0}")]
    ExternalSource(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

/// Longest accepted user id or problem number.
const MAX_IDENTIFIER_LEN: usize = 64;

/// Normalize an external platform user id.
pub fn normalize_user_id(raw: &str) -> DomainResult<String> {
    normalize_identifier("user id", raw)
}

/// Normalize a problem number. A leading `#` is accepted and dropped, so
/// `#7` and `7` name the same problem.
pub fn normalize_problem_number(raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    normalize_identifier("problem number", trimmed.strip_prefix('#').unwrap_or(trimmed))
}

fn normalize_identifier(kind: &str, raw: &str) -> DomainResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DomainError::ValidationFailed(format!("{kind} cannot be empty")));
    }
    if value.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(DomainError::ValidationFailed(format!(
            "{kind} is longer than {MAX_IDENTIFIER_LEN} characters"
        )));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(DomainError::ValidationFailed(format!(
            "{kind} '{value}' contains whitespace or control characters"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_number_strips_hash() {
        assert_eq!(normalize_problem_number("#7").unwrap(), "7");
        assert_eq!(normalize_problem_number("  42 ").unwrap(), "42");
    }

    #[test]
    fn test_identifier_rejections() {
        assert!(matches!(normalize_user_id(""), Err(DomainError::ValidationFailed(_))));
        assert!(matches!(normalize_user_id("   "), Err(DomainError::ValidationFailed(_))));
        assert!(matches!(normalize_problem_number("#"), Err(DomainError::ValidationFailed(_))));
        assert!(matches!(normalize_user_id("a b"), Err(DomainError::ValidationFailed(_))));
        assert!(normalize_user_id(&"x".repeat(65)).is_err());
        assert!(normalize_user_id(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = DomainError::ProblemFinalized("7".to_string());
        assert_eq!(
            err.to_string(),
            "Problem 7 is finalized; unfinalize it before recording attempts"
        );
        assert_eq!(DomainError::NotFinalized("7".into()).to_string(), "Problem 7 is not finalized");
    }
}
