//! Store-specific error type.

use fbmqtt_domain::error::FbMqttError;

/// Errors originating from the in-memory store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A writer panicked while holding the table lock.
    #[error("store lock poisoned")]
    Poisoned,

    /// A record with the same identifier already exists in its scope.
    #[error("{entity} `{identifier}` already exists")]
    Duplicate {
        entity: &'static str,
        identifier: String,
    },
}

impl From<StorageError> for FbMqttError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
