//! Key-value storage capability.
//!
//! The cart and session cache persist through this trait instead of an
//! ambient storage global, so hosts can plug in whatever backing they have
//! (browser storage via bindings, a file, or memory in tests).

use std::collections::HashMap;
use std::sync::Mutex;

/// Storage key for the serialized cart.
pub const CART_KEY: &str = "cart";

/// Storage key for the cached session user.
pub const USER_KEY: &str = "user";

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// A string key-value store.
pub trait KvStore: Send + Sync {
    /// Read a value. `None` if absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str);

    /// Remove a value. Removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

/// In-memory store. The default for tests and headless use.
#[derive(Default)]
pub struct MemoryKvStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.lock().expect("lock poisoned");
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.inner.lock().expect("lock poisoned");
        map.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        let mut map = self.inner.lock().expect("lock poisoned");
        map.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("cart"), None);

        store.set("cart", "[]");
        assert_eq!(store.get("cart").as_deref(), Some("[]"));

        store.set("cart", "[1]");
        assert_eq!(store.get("cart").as_deref(), Some("[1]"));

        store.remove("cart");
        assert_eq!(store.get("cart"), None);
        // removing again is fine
        store.remove("cart");
    }
}
