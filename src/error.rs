//! Error taxonomy for the organization engine.
//!
//! Every registry and service operation returns [`EngineResult`]. Collaborator
//! failures (scan I/O, durable writes) are logged at the boundary where they
//! occur and converted into one of these classified variants.

use std::fmt;
use thiserror::Error;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Desktop icon, keyed by path
    Icon,
    /// Fence, keyed by id
    Fence,
    /// Layout, keyed by id
    Layout,
    /// Category definition, keyed by id
    Category,
    /// The settings value
    Settings,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Icon => write!(f, "icon"),
            Self::Fence => write!(f, "fence"),
            Self::Layout => write!(f, "layout"),
            Self::Category => write!(f, "category"),
            Self::Settings => write!(f, "settings"),
        }
    }
}

/// Classified failure of an engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Referenced entity is absent.
    #[error("{kind} '{key}' not found")]
    NotFound {
        /// Entity kind
        kind: EntityKind,
        /// Key that was looked up
        key: String,
    },
    /// An entity with the same identity already exists.
    #[error("{kind} '{key}' already exists")]
    DuplicateKey {
        /// Entity kind
        kind: EntityKind,
        /// Conflicting key
        key: String,
    },
    /// The operation is not allowed in the entity's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Input was rejected before any state changed.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A durable-write collaborator failed.
    #[error("persistence failed: {0}")]
    PersistenceFailure(String),
    /// The desktop scan collaborator failed.
    #[error("desktop scan failed: {0}")]
    ScanFailure(String),
}

impl EngineError {
    /// Builds a `NotFound` error for the given kind and key.
    pub fn not_found(kind: EntityKind, key: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Builds a `DuplicateKey` error for the given kind and key.
    pub fn duplicate(kind: EntityKind, key: impl fmt::Display) -> Self {
        Self::DuplicateKey {
            kind,
            key: key.to_string(),
        }
    }

    /// Returns true for `NotFound` errors.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::not_found(EntityKind::Fence, "abc");
        assert_eq!(err.to_string(), "fence 'abc' not found");
        assert!(err.is_not_found());

        let err = EngineError::duplicate(EntityKind::Icon, "/desk/a.txt");
        assert_eq!(err.to_string(), "icon '/desk/a.txt' already exists");
        assert!(!err.is_not_found());
    }
}
