//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

use crate::session::SessionError;

/// Errors returned by the estore clients.
///
/// None of these are fatal to the session: a failed wishlist call never
/// changes what the [`SessionContext`](crate::SessionContext) holds.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected locally or by the server (HTTP 400). Not worth retrying.
    #[error("validation error: {0}")]
    Validation(String),

    /// No valid session (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The session may not act on this resource (HTTP 403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The server reports the resource unknown (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource already exists (HTTP 409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Too many requests (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The server failed to read or write its store (HTTP 5xx).
    #[error("storage error: {0}")]
    Storage(String),

    /// The request could not be completed (connection, timeout, bad body).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a status the client does not understand.
    #[error("unexpected response {status}: {message}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,
        /// Message from the response body.
        message: String,
    },

    /// The local session store could not be written.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Map a non-success HTTP status and its message to an error.
    #[must_use]
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(message),
            s if s.is_server_error() => Self::Storage(message),
            s => Self::UnexpectedResponse {
                status: s.as_u16(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let map = |code: u16| {
            ClientError::from_status(StatusCode::from_u16(code).unwrap_or_default(), String::new())
        };

        assert!(matches!(map(400), ClientError::Validation(_)));
        assert!(matches!(map(401), ClientError::Unauthorized(_)));
        assert!(matches!(map(403), ClientError::Forbidden(_)));
        assert!(matches!(map(404), ClientError::NotFound(_)));
        assert!(matches!(map(409), ClientError::Conflict(_)));
        assert!(matches!(map(429), ClientError::RateLimited(_)));
        assert!(matches!(map(500), ClientError::Storage(_)));
        assert!(matches!(map(503), ClientError::Storage(_)));
        assert!(matches!(
            map(418),
            ClientError::UnexpectedResponse { status: 418, .. }
        ));
    }
}
