use clinic_gateway::ApiError;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Per-field messages from local form validation, keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ScreenError {
    /// Local validation failed; nothing was sent
    #[error("{0}")]
    Invalid(FieldErrors),

    #[error("No dialog is open")]
    DialogClosed,

    #[error("No item with id {0} on this page")]
    NotFound(i64),

    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error(transparent)]
    Api(#[from] ApiError),

    /// Form values did not fit the draft type
    #[error("Invalid form data: {0}")]
    Form(#[from] serde_json::Error),
}

impl ScreenError {
    /// True when the user has to log in again.
    pub fn is_session_loss(&self) -> bool {
        matches!(self, ScreenError::Api(e) if e.is_session_loss())
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;
