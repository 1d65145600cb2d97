//! Client-side error taxonomy.
//!
//! Every failure a query or mutation can hit is folded into [`ApiError`]:
//! a kind carrying the semantics, a message fit for direct display, and the
//! HTTP status when one was received.

use std::fmt;

/// Error kind enum, one variant per failure class the UI distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response received; offer a retry.
    Network,
    /// 401: the session is no longer valid.
    Unauthorized,
    /// 4xx with a server-provided message; display it, never retry.
    Validation,
    /// 404: the referenced entity is gone.
    NotFound,
    /// 5xx: generic failure, a single retry is acceptable.
    Server,
    /// The response body could not be decoded.
    Decode,
}

impl ApiErrorKind {
    /// Classify a non-2xx HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            400..=499 => ApiErrorKind::Validation,
            _ => ApiErrorKind::Server,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Network => "NETWORK_FAILURE",
            ApiErrorKind::Unauthorized => "AUTH_FAILURE",
            ApiErrorKind::Validation => "VALIDATION_FAILURE",
            ApiErrorKind::NotFound => "NOT_FOUND",
            ApiErrorKind::Server => "SERVER_FAILURE",
            ApiErrorKind::Decode => "DECODE_FAILURE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// HTTP status of the response, when one arrived at all.
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unauthorized, message).with_status(401)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    /// Build from an HTTP status and the best message the response offered.
    pub fn from_response(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::from_status(status), message).with_status(status)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    // --- Accessors ---

    /// Whether an automatic retry is worth attempting.
    pub fn retryable(&self) -> bool {
        matches!(self.kind, ApiErrorKind::Network | ApiErrorKind::Server)
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    /// Message shown to the user: the server's when it sent one, otherwise a
    /// generic fallback per kind.
    pub fn user_message(&self) -> String {
        if !self.message.is_empty() {
            return self.message.clone();
        }
        match self.kind {
            ApiErrorKind::Network => "Could not reach the server. Check your connection.".into(),
            ApiErrorKind::Unauthorized => "Your session has expired. Please sign in again.".into(),
            ApiErrorKind::Validation => "The request was rejected by the server.".into(),
            ApiErrorKind::NotFound => "The requested item no longer exists.".into(),
            ApiErrorKind::Server | ApiErrorKind::Decode => {
                "Something went wrong. Please try again.".into()
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.error_code(), self.message)?;
        if let Some(status) = self.status {
            write!(f, " (http {})", status)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::decode(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(ApiErrorKind::from_status(404), ApiErrorKind::NotFound);
        assert_eq!(ApiErrorKind::from_status(422), ApiErrorKind::Validation);
        assert_eq!(ApiErrorKind::from_status(500), ApiErrorKind::Server);
        assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::Server);
    }

    #[test]
    fn only_network_and_server_errors_retry() {
        assert!(ApiError::network("offline").retryable());
        assert!(ApiError::from_response(502, "bad gateway").retryable());
        assert!(!ApiError::from_response(400, "invalid name").retryable());
        assert!(!ApiError::unauthorized("expired").retryable());
    }

    #[test]
    fn user_message_falls_back_when_server_was_silent() {
        let silent = ApiError::from_response(500, "");
        assert!(silent.user_message().contains("went wrong"));
        let spoken = ApiError::from_response(400, "Name is taken");
        assert_eq!(spoken.user_message(), "Name is taken");
    }
}
