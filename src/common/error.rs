use thiserror::Error;

use super::types::EntityKind;

/// Registrar error types
#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: EntityKind, key: String },

    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: EntityKind, key: String },

    #[error("Record index {index} out of range (count {count})")]
    OutOfRange { index: u64, count: u64 },

    #[error("Invalid grade symbol: {0:?}")]
    InvalidGrade(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Corrupt {entity} record: {reason}")]
    CorruptRecord { entity: EntityKind, reason: String },

    #[error("Access denied: {0}")]
    AccessDenied(String),
}

impl RegistrarError {
    pub fn not_found(entity: EntityKind, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn duplicate(entity: EntityKind, key: impl ToString) -> Self {
        Self::DuplicateKey {
            entity,
            key: key.to_string(),
        }
    }

    /// Returns true for a key lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, RegistrarError>;
