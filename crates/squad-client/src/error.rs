//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body
    #[error("{code} ({status}): {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    /// No answer within the configured time
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// Realtime gateway failure
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// In-process data path failed
    #[error("Service error: {0}")]
    Service(#[from] squad_service::ServiceError),

    /// Response had an unexpected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Machine-readable error code of an API error
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Authenticated user has not completed sign-up yet
    pub fn is_profile_required(&self) -> bool {
        self.code() == Some("PROFILE_REQUIRED")
    }

    /// Fallback error when the body is not the API error shape
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        let code = match status {
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::FORBIDDEN => "FORBIDDEN",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::CONFLICT => "CONFLICT",
            StatusCode::TOO_MANY_REQUESTS => "RATE_LIMITED",
            _ => "INTERNAL_ERROR",
        };
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            body
        };
        Self::Api {
            status,
            code: code.to_string(),
            message,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Gateway(e.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_codes() {
        let err = ClientError::from_status(StatusCode::CONFLICT, String::new());
        assert!(err.is_conflict());
        assert_eq!(err.code(), Some("CONFLICT"));
        assert_eq!(err.to_string(), "CONFLICT (409 Conflict): Conflict");

        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "upstream".to_string());
        assert_eq!(err.code(), Some("INTERNAL_ERROR"));
        assert!(err.to_string().ends_with("upstream"));
    }

    #[test]
    fn test_profile_required() {
        let err = ClientError::Api {
            status: StatusCode::FORBIDDEN,
            code: "PROFILE_REQUIRED".to_string(),
            message: "Profile required".to_string(),
        };
        assert!(err.is_profile_required());
        assert!(!err.is_not_found());
        assert!(!ClientError::Timeout(3000).is_profile_required());
    }
}
