//! PersistentStateStore - soft-failure reads and writes over a backend
//!
//! Nothing here returns an error to the caller. A failed read or decode yields
//! the caller's default; a failed write is logged and dropped, and the next
//! successful write brings the stored value back in line.

use super::backend::KeyValueBackend;
use super::codec::{Codec, JsonCodec};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

/// Generic string-keyed store with caller-supplied codecs
pub struct PersistentStateStore<B> {
    backend: B,
}

impl<B: KeyValueBackend> PersistentStateStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read and decode the value at `key`, falling back to `default`
    pub fn get<T, C>(&self, key: &str, default: T, codec: &C) -> T
    where
        C: Codec<T>,
    {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                trace!("No stored value for '{}', using default", key);
                return default;
            }
            Err(e) => {
                warn!("Error reading {} storage key \"{}\": {}", self.backend.name(), key, e);
                return default;
            }
        };

        match codec.decode(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Error decoding {} storage key \"{}\": {}", self.backend.name(), key, e);
                default
            }
        }
    }

    /// Encode and write `value` at `key`; failures are logged and ignored
    pub fn set<T, C>(&self, key: &str, value: &T, codec: &C)
    where
        C: Codec<T>,
    {
        let raw = match codec.encode(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Error encoding value for storage key \"{}\": {}", key, e);
                return;
            }
        };

        if let Err(e) = self.backend.write(key, &raw) {
            warn!("Error saving to {} storage key \"{}\": {}", self.backend.name(), key, e);
        }
    }

    /// [`get`](Self::get) with the default JSON codec
    pub fn get_json<T>(&self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        self.get(key, default, &JsonCodec::new())
    }

    /// [`set`](Self::set) with the default JSON codec
    pub fn set_json<T>(&self, key: &str, value: &T)
    where
        T: Serialize + DeserializeOwned,
    {
        self.set(key, value, &JsonCodec::new())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::{FilterStateCodec, MemoryBackend, StorageError};
    use crate::types::{FilterState, RouteId};

    /// Backend that refuses everything, like a disabled browser storage
    pub(crate) struct BrokenBackend;

    impl KeyValueBackend for BrokenBackend {
        fn name(&self) -> &str {
            "broken"
        }

        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_absent_key_returns_default() {
        let store = PersistentStateStore::new(MemoryBackend::new());
        assert_eq!(store.get_json("missing", 7u32), 7);
    }

    #[test]
    fn test_unparseable_value_returns_default() {
        let store = PersistentStateStore::new(MemoryBackend::with_entry("k", "{not json"));
        let default = FilterState::new([RouteId(1)].into_iter().collect(), true);
        let value = store.get("k", default.clone(), &FilterStateCodec);
        assert_eq!(value, default);
    }

    #[test]
    fn test_read_failure_returns_default() {
        let store = PersistentStateStore::new(BrokenBackend);
        assert_eq!(store.get_json("k", String::from("fallback")), "fallback");
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let store = PersistentStateStore::new(BrokenBackend);
        store.set("k", &FilterState::default(), &FilterStateCodec);
    }

    #[test]
    fn test_set_then_get() {
        let store = PersistentStateStore::new(MemoryBackend::new());
        let state = FilterState::new([RouteId(2), RouteId(205)].into_iter().collect(), true);
        store.set("filterState", &state, &FilterStateCodec);
        assert_eq!(store.get("filterState", FilterState::default(), &FilterStateCodec), state);
    }

    #[test]
    fn test_set_overwrites() {
        let backend = MemoryBackend::new();
        let store = PersistentStateStore::new(backend.clone());
        store.set_json("k", &1u32);
        store.set_json("k", &2u32);
        assert_eq!(backend.raw("k").as_deref(), Some("2"));
    }
}
