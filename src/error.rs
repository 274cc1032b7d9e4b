//! Error types shared by the API surface.
//!
//! Store and session failures are logged with their cause but surface to the
//! caller as a generic message; validation and lookup failures keep their
//! text.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input, rejected before touching the store.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Login with a wrong username or password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Request without a valid session.
    #[error("not authenticated")]
    Unauthorized,

    /// The request conflicts with current assignments.
    #[error("{0}")]
    Conflict(String),

    /// Session token could not be issued.
    #[error("could not establish session")]
    Session(#[source] jsonwebtoken::errors::Error),

    /// Store connectivity or query failure.
    #[error("could not retrieve or store data")]
    Store(#[from] sqlx::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Session(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Store(cause) => error!(%cause, "store operation failed"),
            ApiError::Session(cause) => error!(%cause, "session token could not be issued"),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::Validation("missing required fields: 'heart_rate'".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "missing required fields: 'heart_rate'");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = ApiError::NotFound("wearable");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "wearable not found");
    }

    #[test]
    fn store_errors_never_leak_their_cause() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "could not retrieve or store data");
    }

    #[test]
    fn auth_failures_are_unauthorized() {
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }
}
