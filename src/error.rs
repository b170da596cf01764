use thiserror::Error;

use crate::store::Id;
use crate::walk::{WalkCommand, WalkStatus};

/// Rejected walk session commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WalkError {
    #[error("cannot {command} a walk while {from}")]
    InvalidTransition {
        from: WalkStatus,
        command: WalkCommand,
    },
}

/// Errors raised by the list-backed stores
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Id },

    #[error("{field} must not be empty")]
    EmptyContent { field: &'static str },

    #[error("{value:?} is not a date (expected YYYY-MM-DD)")]
    InvalidDate { value: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Trim `value` and reject it when nothing is left
pub fn require_text(value: &str, field: &'static str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyContent { field });
    }
    Ok(trimmed.to_string())
}
