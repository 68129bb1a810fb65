//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::CategoryId;

/// Broad classification of domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller asked for something the model does not allow.
    Validation,
    /// The category data itself is malformed.
    Structural,
    /// A referenced category does not exist.
    Lookup,
}

/// Domain errors represent business rule violations and malformed trees.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid parent selection: category {id} is at level {level}, maximum 3 levels of categories allowed")]
    InvalidParent { id: CategoryId, level: usize },

    #[error("invalid parent selection: category {parent} is {category} itself or one of its descendants")]
    SelfOrDescendantParent {
        category: CategoryId,
        parent: CategoryId,
    },

    #[error("category {id} would reach level {level}, maximum 3 levels of categories allowed")]
    DepthExceeded { id: CategoryId, level: usize },

    #[error("category {0} has an empty name")]
    EmptyName(CategoryId),

    #[error("cycle detected in category tree at: {0}")]
    CycleDetected(CategoryId),

    #[error("duplicate category id: {0}")]
    DuplicateId(CategoryId),

    #[error("category {child} is nested under {actual} but declares parent {declared}")]
    ParentMismatch {
        child: CategoryId,
        declared: CategoryId,
        actual: CategoryId,
    },

    #[error("category {id} is listed at top level but declares parent {parent}")]
    DetachedTopLevel { id: CategoryId, parent: CategoryId },

    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidParent { .. }
            | DomainError::SelfOrDescendantParent { .. }
            | DomainError::DepthExceeded { .. }
            | DomainError::EmptyName(_) => ErrorKind::Validation,
            DomainError::CycleDetected(_)
            | DomainError::DuplicateId(_)
            | DomainError::ParentMismatch { .. }
            | DomainError::DetachedTopLevel { .. } => ErrorKind::Structural,
            DomainError::CategoryNotFound(_) => ErrorKind::Lookup,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
