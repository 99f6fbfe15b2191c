//! Authenticated request gateway.
//!
//! Every resource call goes through [`Gateway::call`]: it obtains a valid
//! access token from the [`clinic_auth::SessionManager`] (refreshing first
//! when it expired), attaches it as a bearer credential, and maps HTTP
//! failures onto [`ApiError`].

mod error;
mod error_body;
mod gateway;

pub use error::{ApiError, ApiResult};
pub use error_body::{extract_error, GENERIC_ERROR_MESSAGE};
pub use gateway::{ApiPayload, Gateway};
