//! Key-value backends for the persistent state store
//!
//! A backend maps string keys to string values and nothing more. The durable
//! backend is an embedded sled database; the in-memory backend serves tests
//! and `--ephemeral` runs.

use super::error::StorageError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Minimal string-keyed durable store
///
/// Note: methods take &self so one backend can be shared behind an Arc.
/// Implementations use interior mutability where they need it.
pub trait KeyValueBackend {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Read the raw value at `key` (`None` when absent)
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Create or overwrite the value at `key`
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Arc<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// Durable backend on top of an embedded sled database
pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    /// Open (or create) the database directory at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the sled database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        info!("State database opened at: {}", path.display());
        Ok(Self { db })
    }

    /// Temporary database removed on drop (tests and dry runs)
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::new().temporary(true).open()?;
        debug!("Temporary state database opened");
        Ok(Self { db })
    }
}

impl KeyValueBackend for SledBackend {
    fn name(&self) -> &str {
        "sled"
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(raw) = self.db.get(key.as_bytes())? else {
            trace!("No stored value at '{}'", key);
            return Ok(None);
        };

        String::from_utf8(raw.to_vec())
            .map(Some)
            .map_err(|_| StorageError::InvalidUtf8 {
                key: key.to_string(),
            })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush()?;
        trace!("Stored {} bytes at '{}'", value.len(), key);
        Ok(())
    }
}

/// Volatile backend, cheap to clone; clones share the same map
#[derive(Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with one raw entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.entries.lock().insert(key.into(), value.into());
        backend
    }

    /// Raw stored value, bypassing any codec
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
