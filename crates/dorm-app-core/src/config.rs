// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for dormitory tools.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A key/value pair that does not map onto a known setting.
    #[error("invalid setting `{key}`: {reason}")]
    Invalid {
        /// Setting name as typed by the user.
        key: String,
        /// Human-readable cause.
        reason: String,
    },
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Serializes config values as JSON and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Best-effort load: missing, unreadable, or malformed values fall back to `T::default()`.
    pub fn load_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.load(key).ok().flatten().unwrap_or_default()
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

/// Volatile store for tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl ConfigStore for MemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        self.blobs
            .borrow()
            .get(key)
            .cloned()
            .ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
