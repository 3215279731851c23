//! Error types for the CheeseListing actor.

use crate::validation::Violations;
use thiserror::Error;

/// Errors that can occur during cheese listing operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheeseListingError {
    /// One or more constraints failed, including the owner's own constraints.
    #[error("Cheese listing validation failed:\n{0}")]
    Validation(Violations),

    #[error("Cheese listing not found: {0}")]
    NotFound(String),

    /// The owner reference does not resolve to a stored user.
    #[error("{0}")]
    Referential(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CheeseListingError {
    fn from(msg: String) -> Self {
        CheeseListingError::ActorCommunicationError(msg)
    }
}
