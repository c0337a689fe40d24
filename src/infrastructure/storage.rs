use crate::application::preference_store::KeyValueStorage;
use crate::domain::errors::StorageError;
use std::cell::RefCell;
use std::collections::HashMap;

/// `window.localStorage`
pub struct LocalStorageBackend {
    storage: web_sys::Storage,
}

impl LocalStorageBackend {
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStorage for LocalStorageBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write { key: key.to_string(), reason: format!("{e:?}") })
    }
}

/// Process-local map. Fallback when `localStorage` is unavailable, and the test backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStorage {
    /// Every write fails, like a full quota
    pub fn read_only() -> Self {
        Self { entries: RefCell::default(), read_only: true }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Write { key: key.to_string(), reason: "QuotaExceededError".into() });
        }
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Either backend behind one type so the app can fall back at startup
pub enum BrowserStorage {
    Local(LocalStorageBackend),
    Memory(MemoryStorage),
}

impl BrowserStorage {
    pub fn open_or_memory() -> Self {
        match LocalStorageBackend::open() {
            Ok(local) => BrowserStorage::Local(local),
            Err(err) => {
                crate::log_warn!(
                    crate::domain::logging::LogComponent::Infrastructure("Storage"),
                    "⚠️ {}; preferences will not survive reload",
                    err
                );
                BrowserStorage::Memory(MemoryStorage::default())
            }
        }
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStorage::Local(local) => local.get(key),
            BrowserStorage::Memory(memory) => memory.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            BrowserStorage::Local(local) => local.set(key, value),
            BrowserStorage::Memory(memory) => memory.set(key, value),
        }
    }
}
