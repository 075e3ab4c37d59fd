//! Value codecs - turning typed values into stored text and back
//!
//! [`JsonCodec`] covers anything serde can represent directly. Types without a
//! natural JSON shape get a dedicated codec; [`FilterStateCodec`] is the one
//! the filter uses, storing the selection set as a plain integer array.

use super::error::CodecError;
use crate::types::{FilterState, RouteId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Encode/decode pair for one stored value type
pub trait Codec<T> {
    fn encode(&self, value: &T) -> Result<String, CodecError>;
    fn decode(&self, raw: &str) -> Result<T, CodecError>;
}

/// Default structured-text codec (JSON)
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, raw: &str) -> Result<T, CodecError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Stored shape of [`FilterState`]
///
/// Every field tolerates being absent or null; the decoded value falls back
/// to the field type's default.
#[derive(Debug, Serialize, Deserialize)]
struct StoredFilterState {
    #[serde(default)]
    selection: Option<Vec<RouteId>>,
    #[serde(default)]
    enabled: Option<bool>,
}

/// Codec for [`FilterState`]: selection as an integer array plus the flag
///
/// The array is written in ascending order; order is ignored on decode and
/// duplicates collapse into the set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterStateCodec;

impl Codec<FilterState> for FilterStateCodec {
    fn encode(&self, value: &FilterState) -> Result<String, CodecError> {
        let stored = StoredFilterState {
            selection: Some(value.selection.iter().copied().collect()),
            enabled: Some(value.enabled),
        };
        Ok(serde_json::to_string(&stored)?)
    }

    fn decode(&self, raw: &str) -> Result<FilterState, CodecError> {
        let stored: StoredFilterState = serde_json::from_str(raw)?;
        Ok(FilterState {
            selection: stored.selection.unwrap_or_default().into_iter().collect(),
            enabled: stored.enabled.unwrap_or_default(),
        })
    }
}
