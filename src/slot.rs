//! Typed access to a single storage slot.
//!
//! [`read`] and [`write`] convert between a slot's JSON text and a Rust
//! value. [`LocalSlot`] keeps the current value of one slot in memory and
//! writes the whole value back on every change.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{Storage, StorageError};

/// Reads and parses the value stored under `key`.
///
/// Returns `default` when the key is absent, the backend fails, or the
/// stored text does not parse as `T`. Never returns an error.
pub fn read<T, S>(storage: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            log::warn!("failed to read slot {key}, using default: {e}");
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("slot {key} holds malformed content, using default: {e}");
            default
        }
    }
}

/// Serializes `value` and overwrites the slot under `key`.
pub fn write<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, &raw)?;
    log::debug!("wrote slot {key} ({} bytes)", raw.len());
    Ok(())
}

/// In-memory state for one storage slot.
///
/// Holds the current value and a version counter that increases on every
/// [`set`](LocalSlot::set). Derived views compare versions to decide whether
/// they must be recomputed.
#[derive(Debug)]
pub struct LocalSlot<T> {
    key: String,
    value: T,
    version: u64,
}

impl<T> LocalSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Loads the slot's current value, falling back to `default`.
    pub fn load<S>(storage: &S, key: impl Into<String>, default: T) -> Self
    where
        S: Storage + ?Sized,
    {
        let key = key.into();
        let value = read(storage, &key, default);
        Self {
            key,
            value,
            version: 0,
        }
    }

    /// Returns the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Returns the number of times the value has been replaced.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the value and writes it to storage.
    ///
    /// The in-memory value is replaced even when the write fails; the
    /// failure is returned so the caller can report it.
    pub fn set<S>(&mut self, storage: &S, value: T) -> Result<(), StorageError>
    where
        S: Storage + ?Sized,
    {
        self.value = value;
        self.version += 1;
        write(storage, &self.key, &self.value)
    }
}
