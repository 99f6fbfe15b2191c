//! API error taxonomy.

use clinic_auth::AuthError;
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure of an authenticated API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// 401: the session is gone and tokens have been cleared
    #[error("Your session has ended, please log in again")]
    Unauthorized,

    /// 403: the session is fine but its roles are not enough
    #[error("You do not have permission to perform this operation")]
    Forbidden,

    /// Non-2xx with per-field messages
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    /// Any other non-2xx
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No session at all; nothing was sent
    #[error("Not logged in")]
    NotAuthenticated,

    /// Refresh was rejected and the session cleared
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// A 2xx body did not match the expected type
    #[error("Could not decode response: {0}")]
    Decode(String),

    /// Session bookkeeping failed (storage, token decoding)
    #[error(transparent)]
    Auth(AuthError),
}

impl ApiError {
    /// Errors after which the user must log in again.
    pub fn is_session_loss(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized | ApiError::NotAuthenticated | ApiError::SessionExpired
        )
    }

    /// HTTP status behind this error, when there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotLoggedIn => ApiError::NotAuthenticated,
            AuthError::SessionExpired => ApiError::SessionExpired,
            AuthError::Network(message) => ApiError::Network(message),
            other => ApiError::Auth(other),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
