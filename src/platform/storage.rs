//! Key/value storage
//!
//! LocalStorage on web. Native keeps values in memory for the life of the
//! process. Failures never reach the game: reads fall back to `None` and
//! writes are dropped with a warning.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}

/// Read a raw string value
#[cfg(target_arch = "wasm32")]
pub fn get_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

/// Write a raw string value
#[cfg(target_arch = "wasm32")]
pub fn set_item(key: &str, value: &str) {
    match local_storage() {
        Some(storage) => {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write '{}' to LocalStorage", key);
            }
        }
        None => log::warn!("LocalStorage unavailable, '{}' not saved", key),
    }
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static MEMORY: std::cell::RefCell<std::collections::HashMap<String, String>> =
        std::cell::RefCell::new(std::collections::HashMap::new());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get_item(key: &str) -> Option<String> {
    MEMORY.with(|m| m.borrow().get(key).cloned())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_item(key: &str, value: &str) {
    MEMORY.with(|m| {
        m.borrow_mut().insert(key.to_string(), value.to_string());
    });
}

/// Read and parse a JSON value. Missing or corrupt entries give `None`.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = get_item(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable '{}' in storage: {}", key, e);
            None
        }
    }
}

/// Serialize a value as JSON and store it
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => set_item(key, &json),
        Err(e) => log::warn!("Failed to serialize '{}': {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        save_json("storage_test_value", &vec![1u32, 2, 3]);
        assert_eq!(load_json::<Vec<u32>>("storage_test_value"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_and_corrupt_values() {
        assert_eq!(load_json::<u64>("storage_test_missing"), None);

        set_item("storage_test_corrupt", "not json {");
        assert_eq!(load_json::<u64>("storage_test_corrupt"), None);
    }
}
