//! Error types for the Campus identity system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CampusError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Forbidden: missing permission {permission}")]
    Forbidden { permission: String },

    #[error("{message}: {errors:?}")]
    OperationFailed {
        message: String,
        errors: Vec<String>,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

pub type CampusResult<T> = Result<T, CampusError>;
