//! Thin wrapper over the browser LocalStorage API.
//!
//! Wraps `web_sys::Storage` directly rather than pulling in `gloo-storage`,
//! keeping the WASM bundle small.

/// Static accessor for browser LocalStorage.
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// Returns the stored value, or `None` when the key is absent or the
    /// storage API is unavailable.
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// Stores `value` under `key`; returns whether the write succeeded.
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// Removes `key`; returns whether the operation succeeded.
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
