//! Account registration payloads.

use crate::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};

/// New staff account, as posted to `auth/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub password: String,
    /// Local only; must equal `password` when set.
    #[serde(skip)]
    pub confirm_password: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub specialization_id: Option<i64>,
}

impl Registration {
    /// Check required fields before anything is sent.
    pub fn validate(&self) -> AuthResult<()> {
        let mut problems = Vec::new();

        if self.username.trim().is_empty() {
            problems.push("username is required");
        }
        if self.password.is_empty() {
            problems.push("password is required");
        }
        if let Some(confirm) = &self.confirm_password {
            if confirm != &self.password {
                problems.push("passwords do not match");
            }
        }
        if !self.email.is_empty() && !clinic_config::is_valid_email(&self.email) {
            problems.push("email is not a valid address");
        }
        if !self.specialization_id.is_some_and(|id| id > 0) {
            problems.push("specialization is required");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(problems.join("\n")))
        }
    }
}

/// Registration outcome message for a rejected status.
pub(crate) fn registration_failure(status: u16) -> AuthError {
    let reason = match status {
        400 => "username missing or already in use",
        401 => "registration details missing",
        500 => "server error, account was not created",
        _ => "registration failed",
    };
    AuthError::RegistrationFailed(reason.to_string())
}

/// A veterinary specialization a new account can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialization {
    pub id: i64,
    pub name: String,
}
