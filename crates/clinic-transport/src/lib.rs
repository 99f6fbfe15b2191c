//! Raw HTTP seam between the console and the clinic REST API.
//!
//! Auth and the request gateway talk to the backend only through the
//! [`Transport`] trait. Production code uses [`ReqwestTransport`]; tests
//! script responses with `StubTransport` (enable the `test-support`
//! feature from another crate's dev-dependencies).

mod error;
mod http;
mod request;
#[cfg(any(test, feature = "test-support"))]
mod stub;

pub use error::{TransportError, TransportResult};
pub use http::ReqwestTransport;
pub use request::{summarize_body, ApiRequest, ApiResponse, HttpMethod};
#[cfg(any(test, feature = "test-support"))]
pub use stub::StubTransport;

use async_trait::async_trait;

/// Sends one request and returns whatever the server answered.
///
/// Non-2xx statuses are NOT errors at this layer; only failures to
/// complete the exchange are.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> TransportResult<ApiResponse>;
}
