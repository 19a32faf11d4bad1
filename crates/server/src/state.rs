//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::memory::{MemoryProductStore, MemorySessionStore, MemoryUserStore};
use crate::db::postgres::{PgProductStore, PgSessionStore, PgUserStore};
use crate::db::{ProductStore, SessionStore, UserStore};
use crate::services::{AuthService, CatalogService};

/// Shared application state, cheap to clone.
///
/// Repositories are held behind trait objects so handlers and services
/// never depend on a concrete backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: Arc<dyn UserStore>,
    products: Arc<dyn ProductStore>,
    sessions: Arc<dyn SessionStore>,
    pool: Option<PgPool>,
    session_ttl: chrono::Duration,
}

impl AppState {
    /// Build state backed by Postgres repositories.
    #[must_use]
    pub fn postgres(pool: PgPool, session_ttl: chrono::Duration) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users: Arc::new(PgUserStore::new(pool.clone())),
                products: Arc::new(PgProductStore::new(pool.clone())),
                sessions: Arc::new(PgSessionStore::new(pool.clone())),
                pool: Some(pool),
                session_ttl,
            }),
        }
    }

    /// Build state backed by in-memory repositories. For tests and demos.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users: Arc::new(MemoryUserStore::new()),
                products: Arc::new(MemoryProductStore::new()),
                sessions: Arc::new(MemorySessionStore::new()),
                pool: None,
                session_ttl: chrono::Duration::hours(1),
            }),
        }
    }

    /// Authentication service over the configured stores.
    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(
            Arc::clone(&self.inner.users),
            Arc::clone(&self.inner.sessions),
            self.inner.session_ttl,
        )
    }

    /// Catalog service over the configured store.
    #[must_use]
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(Arc::clone(&self.inner.products))
    }

    /// User repository.
    #[must_use]
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.inner.users
    }

    /// Database pool, if running against Postgres.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
