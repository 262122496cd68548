//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are the only failures a collection operation reports on its own.
/// Storage and configuration failures are wrapped by outer layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("a {entity} with id={id} not found")]
    NotFound { entity: &'static str, id: String },
}

impl DomainError {
    /// Payload presence check failed.
    pub fn empty_fields() -> Self {
        Self::InvalidInput("fields cannot be empty".to_string())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// The id carried by a `NotFound`, if any.
    pub fn missing_id(&self) -> Option<&str> {
        match self {
            Self::NotFound { id, .. } => Some(id),
            Self::InvalidInput(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_not_found_when_displayed_then_names_entity_and_id() {
        let err = DomainError::not_found("tree", "abc");
        assert_eq!(err.to_string(), "a tree with id=abc not found");
        assert_eq!(err.missing_id(), Some("abc"));
    }

    #[test]
    fn given_empty_fields_when_displayed_then_uses_fixed_message() {
        let err = DomainError::empty_fields();
        assert_eq!(err, DomainError::InvalidInput("fields cannot be empty".into()));
        assert_eq!(err.missing_id(), None);
    }
}
