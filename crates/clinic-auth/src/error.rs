//! Authentication error types.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Local form check failed; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// Backend answered 401 to a login attempt
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Backend answered a login attempt with another non-2xx status
    #[error("Login failed (HTTP {0})")]
    LoginFailed(u16),

    /// Backend rejected a registration
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    /// Unauthenticated endpoint answered with a non-2xx status
    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Access token could not be decoded
    #[error("Token decode failed: {0}")]
    TokenDecode(String),

    /// No session exists
    #[error("Not logged in")]
    NotLoggedIn,

    /// Refresh token rejected or missing; the session has been cleared
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid state transition in the session FSM
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] clinic_storage::StorageError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<clinic_transport::TransportError> for AuthError {
    fn from(err: clinic_transport::TransportError) -> Self {
        AuthError::Network(err.to_string())
    }
}

impl AuthError {
    /// Returns true if this error means the user must log in again.
    pub fn is_session_loss(&self) -> bool {
        matches!(self, AuthError::NotLoggedIn | AuthError::SessionExpired)
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_loss_errors() {
        assert!(AuthError::SessionExpired.is_session_loss());
        assert!(AuthError::NotLoggedIn.is_session_loss());
    }

    #[test]
    fn test_recoverable_errors_keep_session() {
        assert!(!AuthError::InvalidCredentials.is_session_loss());
        assert!(!AuthError::Network("down".to_string()).is_session_loss());
        assert!(!AuthError::Validation("username is required".to_string()).is_session_loss());
    }

    #[test]
    fn test_transport_error_maps_to_network() {
        let err: AuthError = clinic_transport::TransportError::Timeout("30s".to_string()).into();
        assert!(matches!(err, AuthError::Network(_)));
    }
}
