//! HTTP error mapping. Every error is answered with a JSON-LD body, either a
//! `hydra:Error` or a `ConstraintViolationList`.

use crate::cheese_actor::CheeseListingError;
use crate::user_actor::UserError;
use crate::validation::Violations;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(Violations),

    #[error("Not Found")]
    NotFound,

    /// Malformed body or unresolvable reference.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotAcceptable(String),

    #[error("{0}")]
    Internal(String),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::Internal(_) | ApiError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CheeseListingError> for ApiError {
    fn from(e: CheeseListingError) -> Self {
        match e {
            CheeseListingError::Validation(violations) => ApiError::Validation(violations),
            CheeseListingError::NotFound(_) => ApiError::NotFound,
            CheeseListingError::Referential(detail) => ApiError::BadRequest(detail),
            CheeseListingError::ActorCommunicationError(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::Validation(violations) => ApiError::Validation(violations),
            UserError::NotFound(_) => ApiError::NotFound,
            UserError::ReadOnly(detail) => ApiError::BadRequest(detail),
            UserError::ActorCommunicationError(detail) => ApiError::Internal(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = match &self {
            ApiError::Validation(violations) => json!({
                "@context": "/api/contexts/ConstraintViolationList",
                "@type": "ConstraintViolationList",
                "hydra:title": "An error occurred",
                "hydra:description": violations.to_string(),
                "violations": violations.iter().collect::<Vec<_>>(),
            }),
            other => json!({
                "@context": "/api/contexts/Error",
                "@type": "hydra:Error",
                "hydra:title": "An error occurred",
                "hydra:description": other.to_string(),
            }),
        };

        (
            status,
            [(header::CONTENT_TYPE, "application/ld+json; charset=utf-8")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Violation;

    #[test]
    fn domain_errors_map_to_statuses() {
        let mut violations = Violations::new();
        violations.push(Violation::new("title", "This value should not be blank."));
        let cases = [
            (CheeseListingError::Validation(violations), 422),
            (CheeseListingError::NotFound("3".into()), 404),
            (CheeseListingError::Referential("gone".into()), 400),
            (CheeseListingError::ActorCommunicationError("closed".into()), 500),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status().as_u16(), status);
        }
    }

    #[test]
    fn user_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(UserError::NotFound("1".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(UserError::Validation(Violations::new())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
