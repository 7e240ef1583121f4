//! API error type and its HTTP rendering.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use tessera_auth::{AuthError, Challenge, Outcome, Rejection};

/// Errors returned by HTTP handlers and middleware.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed without a challenge (login).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A protected resource was refused.
    #[error("{}", .0.error)]
    Rejected(Rejection),

    /// A blocking worker task did not complete.
    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        let outcome = match self {
            ApiError::Auth(e) => e.outcome(),
            ApiError::Rejected(rejection) => rejection.outcome(),
            ApiError::Task(_) => Outcome::InternalError,
        };
        match outcome {
            Outcome::Unauthorized => StatusCode::UNAUTHORIZED,
            Outcome::BadRequest => StatusCode::BAD_REQUEST,
            Outcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn challenge(&self) -> Option<&Challenge> {
        match self {
            ApiError::Rejected(rejection) => rejection.challenge.as_ref(),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            match self.challenge().and_then(Challenge::description) {
                Some(description) => description.to_string(),
                None => self.to_string(),
            }
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if let Some(challenge) = self.challenge() {
            match HeaderValue::from_str(&challenge.to_string()) {
                Ok(value) => {
                    response.headers_mut().insert(WWW_AUTHENTICATE, value);
                },
                Err(e) => error!(error = %e, "challenge is not a valid header value"),
            }
        }
        response
    }
}
