//! Persisted value - in-memory state mirrored to one storage key
//!
//! Reads the stored value once at construction. Afterwards the in-memory copy
//! is authoritative for the session; every `set` replaces it and writes
//! through to the store.

use super::backend::KeyValueBackend;
use super::codec::Codec;
use super::store::PersistentStateStore;
use std::sync::Arc;
use tracing::debug;

/// One durable value bound to a key and a codec
pub struct Persisted<T, C, B> {
    store: Arc<PersistentStateStore<B>>,
    key: String,
    codec: C,
    value: T,
}

impl<T, C, B> Persisted<T, C, B>
where
    C: Codec<T>,
    B: KeyValueBackend,
{
    /// Load the value at `key`, or `initial` if nothing usable is stored
    pub fn load(store: Arc<PersistentStateStore<B>>, key: impl Into<String>, initial: T, codec: C) -> Self {
        let key = key.into();
        let value = store.get(&key, initial, &codec);
        debug!("Loaded persisted value for '{}'", key);
        Self {
            store,
            key,
            codec,
            value,
        }
    }

    /// Current in-memory value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Storage key this value is bound to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the value and write it through
    ///
    /// A failed write leaves the new in-memory value in place.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.store.set(&self.key, &self.value, &self.codec);
    }
}
