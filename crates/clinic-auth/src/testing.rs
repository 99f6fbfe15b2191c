//! Builders for tests that need realistic tokens and auth responses.

use crate::Claims;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use clinic_transport::ApiResponse;
use serde_json::json;

/// An unsigned JWT carrying the given claims.
pub fn unsigned_token(sub: &str, roles: &[&str], expires_at: DateTime<Utc>) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: expires_at.timestamp(),
    };
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap_or_default());
    format!("{}.{}.sig", header, payload)
}

/// Token valid for the next hour.
pub fn fresh_token(sub: &str, roles: &[&str]) -> String {
    unsigned_token(sub, roles, Utc::now() + Duration::hours(1))
}

/// Token that expired a minute ago.
pub fn expired_token(sub: &str, roles: &[&str]) -> String {
    unsigned_token(sub, roles, Utc::now() - Duration::minutes(1))
}

/// `{token, refreshToken}` body as returned by login and refresh.
pub fn token_response(access_token: &str, refresh_token: &str) -> ApiResponse {
    ApiResponse::json(
        200,
        &json!({ "token": access_token, "refreshToken": refresh_token }),
    )
}
