//! Persistence layer.
//!
//! Repositories are expressed as object-safe ports so the HTTP layer never
//! touches a concrete database handle. [`postgres`] holds the production
//! implementations, [`memory`] the in-memory ones used by tests and demos.
//!
//! ## Tables
//!
//! - `users` - email, password hash, role
//! - `products` - catalog records
//! - `sessions` - opaque bearer tokens with expiry
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p stride-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use stride_core::{Email, Price, ProductId, Role, UserId};

use crate::models::{Product, Session, User};

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Port for user persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by email.
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Get a user by ID.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Create a new user. Fails with [`RepositoryError::Conflict`] if the
    /// email is already registered.
    async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError>;

    /// Get a user together with their password hash, by email.
    ///
    /// Returns `None` if the user doesn't exist.
    async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// List all users in insertion order.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Replace a user's role. Fails with [`RepositoryError::NotFound`] if
    /// the user doesn't exist.
    async fn set_role(&self, id: UserId, role: Role) -> Result<User, RepositoryError>;
}

/// Port for product persistence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// List all products in insertion order.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Create a product with a fresh server-assigned ID.
    async fn create(
        &self,
        name: &str,
        price: Price,
        image: &str,
    ) -> Result<Product, RepositoryError>;

    /// Replace all fields of an existing product.
    async fn update(
        &self,
        id: ProductId,
        name: &str,
        price: Price,
        image: &str,
    ) -> Result<Product, RepositoryError>;

    /// Delete a product. Fails with [`RepositoryError::NotFound`] if absent.
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError>;
}

/// Port for session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a freshly issued session.
    async fn insert(&self, session: &Session) -> Result<(), RepositoryError>;

    /// Look up a session by its token.
    async fn get(&self, token: &str) -> Result<Option<Session>, RepositoryError>;

    /// Delete a session. Deleting an absent token is not an error.
    async fn delete(&self, token: &str) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
