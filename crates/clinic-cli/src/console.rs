//! Wiring shared by every command.

use anyhow::{bail, Result};
use clinic_auth::{Session, SessionManager, SessionState};
use clinic_config::{Config, Paths};
use clinic_gateway::Gateway;
use clinic_storage::{FileTokenStore, TokenStore, TokenVault};
use clinic_transport::{ReqwestTransport, Transport};
use std::sync::Arc;

pub struct Console {
    pub config: Config,
    pub auth: Arc<SessionManager>,
    pub gateway: Gateway,
}

impl Console {
    /// Tokens persist in `<base>/tokens.json`; requests go to the configured API root.
    pub fn new(paths: Paths, config: Config) -> Result<Self> {
        let store = Arc::new(FileTokenStore::new(paths.token_file()));
        let transport = Arc::new(ReqwestTransport::new(
            config.api_base_url()?,
            config.request_timeout(),
        )?);
        Ok(Self::with_parts(config, store, transport))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let auth = Arc::new(SessionManager::new(TokenVault::new(store), transport.clone()));
        let gateway = Gateway::new(auth.clone(), transport);
        Self {
            config,
            auth,
            gateway,
        }
    }

    /// Reload the stored session, refreshing it if needed.
    pub async fn require_session(&self) -> Result<Session> {
        match self.auth.bootstrap().await? {
            SessionState::Authenticated(session) => Ok(session),
            _ => bail!("Not logged in. Run `vetclinic login` first"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_auth::roles::ROLE_VETERINARIAN;
    use clinic_auth::testing::{expired_token, fresh_token, token_response};
    use clinic_storage::{MemoryTokenStore, StoreKeys};
    use clinic_transport::{HttpMethod, StubTransport};

    fn console_with(store: Arc<MemoryTokenStore>, stub: Arc<StubTransport>) -> Console {
        Console::with_parts(Config::default(), store, stub)
    }

    #[tokio::test]
    async fn test_require_session_without_tokens() {
        let console = console_with(Arc::new(MemoryTokenStore::new()), Arc::new(StubTransport::new()));

        let err = console.require_session().await.unwrap_err();
        assert!(err.to_string().contains("vetclinic login"));
    }

    #[tokio::test]
    async fn test_require_session_refreshes_expired_token() {
        let store = Arc::new(MemoryTokenStore::new());
        store
            .set(StoreKeys::ACCESS_TOKEN, &expired_token("drsmith", &[ROLE_VETERINARIAN]))
            .unwrap();
        store.set(StoreKeys::REFRESH_TOKEN, "r1").unwrap();
        let stub = Arc::new(StubTransport::new());
        stub.respond(
            HttpMethod::Post,
            "auth/refresh-token",
            token_response(&fresh_token("drsmith", &[ROLE_VETERINARIAN]), "r2"),
        );
        let console = console_with(store.clone(), stub.clone());

        let session = console.require_session().await.unwrap();

        assert_eq!(session.subject, "drsmith");
        assert_eq!(stub.count(HttpMethod::Post, "auth/refresh-token"), 1);
        assert_eq!(store.get(StoreKeys::REFRESH_TOKEN).unwrap().as_deref(), Some("r2"));
    }
}
