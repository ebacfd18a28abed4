//! Error types for the HTTP surface.
//!
//! Every failure a request can hit is a variant of [`Error`]. Each variant
//! maps to exactly one status code and renders as a JSON body of the form
//! `{"error": "<message>"}`, so no error path is ever swallowed.
//!
//! ## Error Cases
//! - `InvalidCount`: `count` was malformed or outside `0..=max_count` (400).
//! - `MethodNotAllowed`: the route was hit with an unexpected method (405).
//! - `IdGeneration`: the identifier source failed mid-batch (500).
//! - `GenerationTask`: the blocking task building the batch panicked or was
//!   cancelled (500).

use crate::server::telemetry::increment_request_errors;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the ID issuance service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The `count` query parameter could not be accepted.
    #[error(
        "count query parameter must be a valid positive integer less than or equal to {max_count}"
    )]
    InvalidCount { max_count: usize },

    /// The request method does not match the one the route was registered
    /// for.
    #[error("this method is not supported")]
    MethodNotAllowed,

    /// The identifier source could not produce an identifier.
    #[error("failed to generate identifiers")]
    IdGeneration(#[from] flakebatch::Error),

    /// The task generating the batch did not run to completion.
    #[error("failed to generate identifiers")]
    GenerationTask(#[from] tokio::task::JoinError),
}

impl Error {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCount { .. } => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::IdGeneration(_) | Self::GenerationTask(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        increment_request_errors();

        let status = self.status();
        match &self {
            Self::IdGeneration(source) => {
                tracing::error!(error = %source, "identifier generation failed");
            }
            Self::GenerationTask(source) => {
                tracing::error!(error = %source, "identifier generation task failed");
            }
            _ => tracing::debug!(%status, "rejecting request: {self}"),
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_count_message_embeds_limit() {
        assert_eq!(
            Error::InvalidCount { max_count: 1000 }.to_string(),
            "count query parameter must be a valid positive integer less than or equal to 1000"
        );
    }

    #[test]
    fn statuses() {
        assert_eq!(
            Error::InvalidCount { max_count: 1 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            Error::IdGeneration(flakebatch::Error::Exhausted { attempts: 1 }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
