//! Scripted in-process backend for tests.

use crate::{ApiRequest, ApiResponse, HttpMethod, Transport, TransportError, TransportResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

type Handler = Box<dyn Fn(&ApiRequest) -> TransportResult<ApiResponse> + Send + Sync>;

struct Route {
    method: HttpMethod,
    path: String,
    handler: Handler,
}

/// Answers requests from registered handlers, matched on method and the
/// path without its query string. Later registrations win, so a test can
/// override a default route. Unmatched requests get an empty 404.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<Vec<Route>>,
    log: Mutex<Vec<ApiRequest>>,
    latency: Option<Duration>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response, so concurrent callers overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn on<F>(&self, method: HttpMethod, path: &str, handler: F) -> &Self
    where
        F: Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static,
    {
        self.route(method, path, Box::new(move |req| Ok(handler(req))))
    }

    /// Always answer `method path` with `response`.
    pub fn respond(&self, method: HttpMethod, path: &str, response: ApiResponse) -> &Self {
        self.on(method, path, move |_| response.clone())
    }

    /// Make `method path` fail as if the network were down.
    pub fn fail(&self, method: HttpMethod, path: &str) -> &Self {
        let target = format!("{} {}", method, path);
        self.route(
            method,
            path,
            Box::new(move |_| Err(TransportError::Network(format!("{} unreachable", target)))),
        )
    }

    fn route(&self, method: HttpMethod, path: &str, handler: Handler) -> &Self {
        self.routes.lock().push(Route {
            method,
            path: path.trim_start_matches('/').to_string(),
            handler,
        });
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().clone()
    }

    /// Number of requests received for `method path` (query ignored).
    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let path = path.trim_start_matches('/');
        self.log.lock()
            .iter()
            .filter(|r| r.method == method && r.route().trim_start_matches('/') == path)
            .count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        self.log.lock().push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let routes = self.routes.lock();
        let route = request.route().trim_start_matches('/');
        match routes
            .iter()
            .rev()
            .find(|r| r.method == request.method && r.path == route)
        {
            Some(r) => (r.handler)(&request),
            None => Ok(ApiResponse::empty(404)),
        }
    }
}
