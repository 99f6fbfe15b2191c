//! Storage trait definitions.

use crate::StorageResult;

/// Persisted key/value storage for client credentials.
///
/// Purely storage: no expiry or token semantics live here.
pub trait TokenStore: Send + Sync {
    /// Store a value under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Remove a value. Returns whether anything was removed.
    fn clear(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists.
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
