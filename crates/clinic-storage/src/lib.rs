//! Token storage for the VetClinic console.
//!
//! Two backends implement [`TokenStore`]:
//! - **File**: a JSON object persisted under the console's base directory
//! - **Memory**: process-local, for tests and throwaway sessions
//!
//! [`TokenVault`] is the typed view the auth layer works with.

mod file;
mod keys;
mod memory;
mod traits;
mod vault;

pub use file::FileTokenStore;
pub use keys::StoreKeys;
pub use memory::MemoryTokenStore;
pub use traits::TokenStore;
pub use vault::{TokenPair, TokenVault};

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Stored data could not be decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_contract() {
        let store = MemoryTokenStore::new();

        store.set("test_key", "test_value").unwrap();
        assert_eq!(store.get("test_key").unwrap(), Some("test_value".to_string()));

        assert!(store.has("test_key").unwrap());
        assert!(!store.has("nonexistent").unwrap());

        assert!(store.clear("test_key").unwrap());
        assert!(!store.clear("test_key").unwrap());
        assert_eq!(store.get("test_key").unwrap(), None);
    }

    #[test]
    fn test_store_keys_are_distinct() {
        assert!(!StoreKeys::ACCESS_TOKEN.is_empty());
        assert!(!StoreKeys::REFRESH_TOKEN.is_empty());
        assert_ne!(StoreKeys::ACCESS_TOKEN, StoreKeys::REFRESH_TOKEN);
    }
}
