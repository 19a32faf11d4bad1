//! Cached session view.
//!
//! After login the client remembers who is signed in (and their token) in
//! the key-value store so the UI can render without a round-trip. The
//! server session remains the source of truth; a stale cache only costs a
//! `401` on the next request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stride_core::{Role, UserId};

use crate::kv::{KvStore, TOKEN_KEY, USER_KEY};

/// The locally cached identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    /// Whether the cached user is an admin.
    ///
    /// Rendering only; the server re-checks the role on every request.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Session cache over a key-value store.
pub struct SessionCache {
    store: Arc<dyn KvStore>,
}

impl SessionCache {
    /// Create a cache over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Persist the user and token after a successful login.
    pub fn store(&self, user: &SessionUser, token: &str) {
        if let Ok(json) = serde_json::to_string(user) {
            self.store.set(USER_KEY, &json);
        }
        self.store.set(TOKEN_KEY, token);
    }

    /// The cached user, if any. Corrupt data reads as signed out.
    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(%err, "discarding corrupt session cache");
                self.store.remove(USER_KEY);
                None
            }
        }
    }

    /// The cached bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    /// Whether the cached user is an admin. `false` when signed out.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.is_admin())
    }

    /// Forget the cached user and token.
    pub fn clear(&self) {
        self.store.remove(USER_KEY);
        self.store.remove(TOKEN_KEY);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;

    fn cache() -> SessionCache {
        SessionCache::new(Arc::new(MemoryKvStore::new()))
    }

    fn user(role: Role) -> SessionUser {
        SessionUser {
            id: UserId::new(1),
            email: "shopper@stride.test".to_owned(),
            role,
        }
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let cache = cache();
        let user = user(Role::User);

        cache.store(&user, "tok-123");
        assert_eq!(cache.user().unwrap(), user);
        assert_eq!(cache.token().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_signed_out_by_default() {
        let cache = cache();
        assert!(cache.user().is_none());
        assert!(cache.token().is_none());
        assert!(!cache.is_admin());
    }

    #[test]
    fn test_is_admin_reflects_cached_role() {
        let cache = cache();
        cache.store(&user(Role::User), "tok");
        assert!(!cache.is_admin());

        cache.store(&user(Role::Admin), "tok");
        assert!(cache.is_admin());
    }

    #[test]
    fn test_corrupt_cache_reads_as_signed_out() {
        let store = Arc::new(MemoryKvStore::new());
        store.set(USER_KEY, "{not json");

        let cache = SessionCache::new(store.clone());
        assert!(cache.user().is_none());
        // corrupt entry is dropped
        assert!(store.get(USER_KEY).is_none());
    }

    #[test]
    fn test_clear_forgets_everything() {
        let cache = cache();
        cache.store(&user(Role::Admin), "tok");

        cache.clear();
        assert!(cache.user().is_none());
        assert!(cache.token().is_none());
    }
}
