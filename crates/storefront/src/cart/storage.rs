//! Backing stores for the persisted cart.
//!
//! A storage slot holds one serialized string, the way a browser's local
//! storage holds one value per key.

use std::future::Future;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tower_sessions::Session;

/// Failures reading or writing a storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session store rejected the operation.
    #[error("session storage error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The storage is unavailable or full.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single string slot the cart is persisted to.
pub trait CartStorage: Send + Sync {
    /// Read the stored value, if any.
    fn read(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the stored value.
    fn write(&self, value: String) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the stored value.
    fn remove(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

// =============================================================================
// Session Storage
// =============================================================================

/// Storage slot inside the visitor's HTTP session.
#[derive(Clone)]
pub struct SessionCartStorage {
    session: Session,
    key: &'static str,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session, key: &'static str) -> Self {
        Self { session, key }
    }
}

impl CartStorage for SessionCartStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.session.get::<String>(self.key).await?)
    }

    async fn write(&self, value: String) -> Result<(), StorageError> {
        Ok(self.session.insert(self.key, value).await?)
    }

    async fn remove(&self) -> Result<(), StorageError> {
        self.session.remove::<String>(self.key).await?;
        Ok(())
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process storage slot.
///
/// Clones share the slot, so a test can keep a handle and inspect what the
/// store wrote. Writes can be made to fail to simulate a full storage.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Default)]
struct MemorySlot {
    value: Option<String>,
    reject_writes: bool,
}

impl MemoryStorage {
    /// Empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with a raw value.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut slot) = storage.inner.lock() {
            slot.value = Some(value.into());
        }
        storage
    }

    /// Make every subsequent write fail.
    pub fn reject_writes(&self, reject: bool) {
        if let Ok(mut slot) = self.inner.lock() {
            slot.reject_writes = reject;
        }
    }

    /// Current raw value.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|slot| slot.value.clone())
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut MemorySlot) -> Result<T, StorageError>) -> Result<T, StorageError> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slot poisoned".to_string()))?;
        f(&mut slot)
    }
}

impl CartStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        self.with_slot(|slot| Ok(slot.value.clone()))
    }

    async fn write(&self, value: String) -> Result<(), StorageError> {
        self.with_slot(|slot| {
            if slot.reject_writes {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            slot.value = Some(value);
            Ok(())
        })
    }

    async fn remove(&self) -> Result<(), StorageError> {
        self.with_slot(|slot| {
            slot.value = None;
            Ok(())
        })
    }
}
