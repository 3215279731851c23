//! Error types for the User actor.

use crate::validation::Violations;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// The user data provided is invalid.
    #[error("User validation failed:\n{0}")]
    Validation(Violations),

    /// The requested user was not found.
    #[error("User not found: {0}")]
    NotFound(String),

    /// Stored users cannot be modified.
    #[error("User {0} is read-only")]
    ReadOnly(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for UserError {
    fn from(msg: String) -> Self {
        UserError::ActorCommunicationError(msg)
    }
}
