//! Key-value persistence of JSON blobs
//!
//! Profile, leaderboard and settings are each stored as one JSON string under
//! a fixed key. A missing or undecodable blob means "start fresh".

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Load a value from `key`, falling back to the default on any failure
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str::<T>(&json) {
            Ok(value) => {
                log::info!("Loaded {}", key);
                value
            }
            Err(e) => {
                log::warn!("Could not decode {}, using defaults: {}", key, e);
                T::default()
            }
        },
        Ok(None) => {
            log::info!("No {} found, starting fresh", key);
            T::default()
        }
        Err(e) => {
            log::warn!("Could not read {}, using defaults: {}", key, e);
            T::default()
        }
    }
}

/// Encode a value as JSON and store it under `key`
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)?;
    log::debug!("Saved {} ({} bytes)", key, json.len());
    Ok(())
}
