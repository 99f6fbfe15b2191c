//! Typed access to the persisted token pair.

use crate::{StorageResult, StoreKeys, TokenStore};
use std::sync::Arc;

/// Access and refresh token as stored together after login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// High-level API over a [`TokenStore`] for the two credential keys.
#[derive(Clone)]
pub struct TokenVault {
    storage: Arc<dyn TokenStore>,
}

impl TokenVault {
    pub fn new(storage: Arc<dyn TokenStore>) -> Self {
        Self { storage }
    }

    /// Retrieve the access token
    pub fn access_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StoreKeys::ACCESS_TOKEN)
    }

    /// Retrieve the refresh token
    pub fn refresh_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StoreKeys::REFRESH_TOKEN)
    }

    /// Both tokens, if both are present.
    pub fn pair(&self) -> StorageResult<Option<TokenPair>> {
        match (self.access_token()?, self.refresh_token()?) {
            (Some(access_token), Some(refresh_token)) => Ok(Some(TokenPair {
                access_token,
                refresh_token,
            })),
            _ => Ok(None),
        }
    }

    /// Persist both tokens.
    pub fn store_pair(&self, pair: &TokenPair) -> StorageResult<()> {
        self.storage.set(StoreKeys::ACCESS_TOKEN, &pair.access_token)?;
        self.storage.set(StoreKeys::REFRESH_TOKEN, &pair.refresh_token)?;
        tracing::debug!("token pair stored");
        Ok(())
    }

    /// Replace the access token only; the refresh token is kept as is.
    pub fn store_access_token(&self, access_token: &str) -> StorageResult<()> {
        self.storage.set(StoreKeys::ACCESS_TOKEN, access_token)
    }

    /// Remove both tokens. Clearing an empty vault is not an error.
    pub fn clear(&self) -> StorageResult<()> {
        let had_access = self.storage.clear(StoreKeys::ACCESS_TOKEN)?;
        let had_refresh = self.storage.clear(StoreKeys::REFRESH_TOKEN)?;
        tracing::debug!(had_access, had_refresh, "token pair cleared");
        Ok(())
    }

    /// Whether an access token is present (validity is not checked).
    pub fn has_access_token(&self) -> StorageResult<bool> {
        self.storage.has(StoreKeys::ACCESS_TOKEN)
    }
}
