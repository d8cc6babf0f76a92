use std::fmt;

use thiserror::Error;

use crate::answers::ValidationErrors;

/// Kind of entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Page,
    Question,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Page => write!(f, "page"),
            EntityKind::Question => write!(f, "question"),
        }
    }
}

/// Failures reported by the editor, the answer collector, and scoring.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("page {} has {} unanswered required question(s)", .page_index + 1, .errors.len())]
    ValidationFailed {
        page_index: usize,
        errors: ValidationErrors,
    },
    #[error("form has no questions to score")]
    NoQuestions,
    #[error("form has no pages")]
    EmptyForm,
    #[error("duplicate id '{0}'")]
    DuplicateId(String),
    #[error("invalid form: {0}")]
    InvalidForm(String),
}

impl QuizError {
    pub(crate) fn page_not_found(id: &str) -> Self {
        QuizError::NotFound {
            kind: EntityKind::Page,
            id: id.to_string(),
        }
    }

    pub(crate) fn question_not_found(id: &str) -> Self {
        QuizError::NotFound {
            kind: EntityKind::Question,
            id: id.to_string(),
        }
    }

    /// Validation errors carried by a `ValidationFailed`, if any.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            QuizError::ValidationFailed { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
