//! Access token claims.
//!
//! Tokens are decoded, not verified: the backend checks signatures on every
//! call, the client only needs the subject, roles and expiry.

use crate::{AuthError, AuthResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims consumed from the access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Role tags, `ROLE_` prefixed
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiry, Unix seconds
    pub exp: i64,
}

impl Claims {
    /// Decode the payload segment of a JWT.
    pub fn decode(token: &str) -> AuthResult<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if !payload.is_empty() => payload,
            _ => return Err(AuthError::TokenDecode("expected three segments".to_string())),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::TokenDecode(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| AuthError::TokenDecode(e.to_string()))
    }

    pub fn expires_at(&self) -> AuthResult<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
            .ok_or_else(|| AuthError::TokenDecode(format!("exp out of range: {}", self.exp)))
    }
}
