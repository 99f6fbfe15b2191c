//! Configuration, filesystem paths and logging bootstrap for the VetClinic console.

mod config;
mod error;
mod logging;
mod paths;
mod validation;

pub use config::{
    Config, DEFAULT_API_BASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
pub use validation::is_valid_email;
