use crate::{extract_error, ApiError, ApiResult};
use clinic_auth::SessionManager;
use clinic_transport::{summarize_body, ApiRequest, ApiResponse, HttpMethod, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    Json(Value),
    /// Empty or non-JSON body, as received.
    Text(String),
}

impl ApiPayload {
    /// JSON view of the payload; text becomes a JSON string, empty text null.
    pub fn into_json(self) -> Value {
        match self {
            ApiPayload::Json(value) => value,
            ApiPayload::Text(text) if text.trim().is_empty() => Value::Null,
            ApiPayload::Text(text) => Value::String(text),
        }
    }
}

/// Sends authenticated calls on behalf of resource clients.
#[derive(Clone)]
pub struct Gateway {
    auth: Arc<SessionManager>,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    pub fn new(auth: Arc<SessionManager>, transport: Arc<dyn Transport>) -> Self {
        Self { auth, transport }
    }

    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.auth
    }

    /// Issue one authenticated call.
    ///
    /// An expired access token is refreshed before the call is sent. A 401
    /// clears the session; nothing is retried.
    pub async fn call(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<Value>,
    ) -> ApiResult<ApiPayload> {
        let token = self.auth.valid_access_token().await?;

        let mut request = ApiRequest::new(method, endpoint).with_bearer(token);
        request.body = body;

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(method = %method, endpoint = %endpoint, error = %e, "API call did not complete");
            ApiError::Network(e.to_string())
        })?;

        match response.status {
            401 => {
                warn!(method = %method, endpoint = %endpoint, "API call unauthorized, ending session");
                self.auth.invalidate();
                Err(ApiError::Unauthorized)
            }
            403 => {
                warn!(method = %method, endpoint = %endpoint, "API call forbidden");
                Err(ApiError::Forbidden)
            }
            status if !response.is_success() => {
                warn!(
                    method = %method,
                    endpoint = %endpoint,
                    status = status,
                    body = %summarize_body(&response.body),
                    "API call failed"
                );
                Err(extract_error(status, &response.body))
            }
            status => {
                debug!(method = %method, endpoint = %endpoint, status = status, "API call succeeded");
                payload(response)
            }
        }
    }

    /// Call and decode the body as `T`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<Value>,
    ) -> ApiResult<T> {
        let value = self.call(endpoint, method, body).await?.into_json();
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{}: {}", endpoint, e)))
    }

    pub async fn get(&self, endpoint: &str) -> ApiResult<ApiPayload> {
        self.call(endpoint, HttpMethod::Get, None).await
    }

    pub async fn post(&self, endpoint: &str, body: Value) -> ApiResult<ApiPayload> {
        self.call(endpoint, HttpMethod::Post, Some(body)).await
    }

    pub async fn put(&self, endpoint: &str, body: Value) -> ApiResult<ApiPayload> {
        self.call(endpoint, HttpMethod::Put, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiResult<ApiPayload> {
        self.call(endpoint, HttpMethod::Delete, None).await
    }
}

fn payload(response: ApiResponse) -> ApiResult<ApiPayload> {
    if !response.is_json() || response.body.trim().is_empty() {
        return Ok(ApiPayload::Text(response.body));
    }
    serde_json::from_str(&response.body)
        .map(ApiPayload::Json)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_auth::roles::{ROLE_ADMIN, ROLE_RECEPTIONIST};
    use clinic_auth::testing::{expired_token, fresh_token, token_response};
    use clinic_auth::SessionState;
    use clinic_storage::{MemoryTokenStore, StoreKeys, TokenStore, TokenVault};
    use clinic_transport::StubTransport;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    struct Harness {
        store: Arc<MemoryTokenStore>,
        stub: Arc<StubTransport>,
        gateway: Gateway,
    }

    async fn signed_in(stub: StubTransport, access_token: &str) -> Harness {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(StoreKeys::ACCESS_TOKEN, access_token).unwrap();
        store.set(StoreKeys::REFRESH_TOKEN, "r1").unwrap();

        let stub = Arc::new(stub);
        let auth = Arc::new(SessionManager::new(TokenVault::new(store.clone()), stub.clone()));
        auth.bootstrap().await.unwrap();

        Harness {
            store,
            gateway: Gateway::new(auth, stub.clone()),
            stub,
        }
    }

    #[tokio::test]
    async fn test_attaches_bearer_and_parses_json() {
        let token = fresh_token("admin", &[ROLE_ADMIN]);
        let h = signed_in(StubTransport::new(), &token).await;
        h.stub.respond(
            HttpMethod::Get,
            "owners/5",
            ApiResponse::json(200, &json!({ "id": 5, "fullName": "Jane Doe" })),
        );

        let payload = h.gateway.get("owners/5").await.unwrap();

        assert_eq!(payload, ApiPayload::Json(json!({ "id": 5, "fullName": "Jane Doe" })));
        assert_eq!(h.stub.requests()[0].bearer.as_deref(), Some(token.as_str()));
    }

    #[tokio::test]
    async fn test_non_json_success_is_text() {
        let h = signed_in(StubTransport::new(), &fresh_token("admin", &[ROLE_ADMIN])).await;
        h.stub
            .respond(HttpMethod::Delete, "owners/5", ApiResponse::text(200, "Owner deleted"));
        h.stub.respond(HttpMethod::Put, "owners/5", ApiResponse::empty(204));

        assert_eq!(
            h.gateway.delete("owners/5").await.unwrap(),
            ApiPayload::Text("Owner deleted".to_string())
        );
        assert_eq!(
            h.gateway.put("owners/5", json!({})).await.unwrap(),
            ApiPayload::Text(String::new())
        );
    }

    #[tokio::test]
    async fn test_401_clears_session_and_tokens() {
        let h = signed_in(StubTransport::new(), &fresh_token("admin", &[ROLE_ADMIN])).await;
        h.stub.respond(HttpMethod::Get, "species", ApiResponse::empty(401));

        let err = h.gateway.get("species").await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(h.gateway.session_manager().state(), SessionState::Unauthenticated);
        assert_eq!(h.store.get(StoreKeys::ACCESS_TOKEN).unwrap(), None);
        assert_eq!(h.store.get(StoreKeys::REFRESH_TOKEN).unwrap(), None);
        assert_eq!(h.stub.count(HttpMethod::Post, "auth/refresh-token"), 0);
    }

    #[tokio::test]
    async fn test_403_keeps_session() {
        let h = signed_in(StubTransport::new(), &fresh_token("desk", &[ROLE_RECEPTIONIST])).await;
        h.stub.respond(HttpMethod::Delete, "owners/5", ApiResponse::empty(403));
        let before = h.gateway.session_manager().session().unwrap();

        let err = h.gateway.delete("owners/5").await.unwrap_err();

        assert!(matches!(err, ApiError::Forbidden));
        let state = h.gateway.session_manager().state();
        assert_eq!(state.session(), Some(&before));
        assert!(h.gateway.session_manager().has_role(&[ROLE_RECEPTIONIST]));
        assert!(h.store.get(StoreKeys::ACCESS_TOKEN).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_field_errors_become_validation_message() {
        let h = signed_in(StubTransport::new(), &fresh_token("admin", &[ROLE_ADMIN])).await;
        h.stub.respond(
            HttpMethod::Post,
            "owners",
            ApiResponse::json(
                400,
                &json!({ "exception": { "message": { "username": ["Username taken"] } } }),
            ),
        );

        let err = h.gateway.post("owners", json!({})).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation { .. }));
        assert_eq!(err.to_string(), "username: Username taken");
        assert!(h.gateway.session_manager().state().is_authenticated());
    }

    #[tokio::test]
    async fn test_no_session_sends_nothing() {
        let stub = Arc::new(StubTransport::new());
        let store = Arc::new(MemoryTokenStore::new());
        let auth = Arc::new(SessionManager::new(TokenVault::new(store), stub.clone()));
        let gateway = Gateway::new(auth, stub.clone());

        let err = gateway.get("owners").await.unwrap_err();

        assert!(matches!(err, ApiError::NotAuthenticated));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let h = signed_in(StubTransport::new(), &fresh_token("admin", &[ROLE_ADMIN])).await;
        h.stub.fail(HttpMethod::Get, "breeds");

        let err = h.gateway.get("breeds").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert!(!err.is_session_loss());
    }

    #[tokio::test]
    async fn test_concurrent_calls_with_expired_token_refresh_once() {
        let stub = StubTransport::new().with_latency(Duration::from_millis(20));
        let renewed = fresh_token("admin", &[ROLE_ADMIN]);
        stub.respond(
            HttpMethod::Post,
            "auth/login",
            token_response(&expired_token("admin", &[ROLE_ADMIN]), "r1"),
        );
        stub.respond(
            HttpMethod::Post,
            "auth/refresh-token",
            token_response(&renewed, "r2"),
        );
        stub.respond(
            HttpMethod::Get,
            "owners",
            ApiResponse::json(200, &json!({ "content": [] })),
        );
        stub.respond(
            HttpMethod::Get,
            "patients",
            ApiResponse::json(200, &json!({ "content": [] })),
        );
        let stub = Arc::new(stub);
        let store = Arc::new(MemoryTokenStore::new());
        let auth = Arc::new(SessionManager::new(TokenVault::new(store), stub.clone()));
        auth.login("admin", "pw").await.unwrap();
        let gateway = Gateway::new(auth, stub.clone());

        let (a, b) = tokio::join!(gateway.get("owners"), gateway.get("patients"));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(stub.count(HttpMethod::Post, "auth/refresh-token"), 1);
        let bearers: Vec<_> = stub
            .requests()
            .into_iter()
            .filter(|r| r.method == HttpMethod::Get)
            .map(|r| r.bearer)
            .collect();
        assert_eq!(bearers, vec![Some(renewed.clone()), Some(renewed)]);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Owner {
        id: i64,
    }

    #[tokio::test]
    async fn test_call_json_decodes_or_reports_decode_error() {
        let h = signed_in(StubTransport::new(), &fresh_token("admin", &[ROLE_ADMIN])).await;
        h.stub
            .respond(HttpMethod::Get, "owners/1", ApiResponse::json(200, &json!({ "id": 1 })));
        h.stub
            .respond(HttpMethod::Get, "owners/2", ApiResponse::text(200, "not json"));

        let owner: Owner = h
            .gateway
            .call_json("owners/1", HttpMethod::Get, None)
            .await
            .unwrap();
        assert_eq!(owner, Owner { id: 1 });

        let err = h
            .gateway
            .call_json::<Owner>("owners/2", HttpMethod::Get, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
