//! Persistent state storage - string-keyed durable values with explicit codecs
//!
//! The store only knows about strings. Callers pick a [`Codec`] per key so that
//! values without a natural JSON shape (sets, most notably) keep exact
//! semantics. Reads and writes never fail from the caller's point of view:
//! errors are logged and the default (for reads) or the in-memory value (for
//! writes) stays authoritative.

mod backend;
mod codec;
mod error;
mod persisted;
mod store;

pub use backend::{KeyValueBackend, MemoryBackend, SledBackend};
pub use codec::{Codec, FilterStateCodec, JsonCodec};
pub use error::{CodecError, StorageError};
pub use persisted::Persisted;
pub use store::PersistentStateStore;

/// Storage key used for the route filter state
pub const FILTER_STATE_KEY: &str = "filterState";
