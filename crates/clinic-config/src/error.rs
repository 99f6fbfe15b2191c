//! Configuration errors.

use thiserror::Error;

/// Failure to load, validate or locate console configuration.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A value the console cannot work with
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `api_base_url` is not an absolute URL
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Unreadable or unwritable `config.json`
    #[error("Malformed config file: {0}")]
    Json(#[from] serde_json::Error),

    /// No home directory to put `~/.vetclinic` in
    #[error("Path error: {0}")]
    Path(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
