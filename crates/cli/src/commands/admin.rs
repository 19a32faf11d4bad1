//! Admin account management commands.
//!
//! Registration over the API always yields a regular user; admin accounts
//! are created here or promoted by an existing admin.

use std::sync::Arc;

use thiserror::Error;

use stride_core::{Email, Role};
use stride_server::db::postgres::PgUserStore;
use stride_server::db::{RepositoryError, UserStore};
use stride_server::services::auth::hash_password;

use super::ConnectError;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database connection error.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] stride_core::EmailError),

    /// Account already exists.
    #[error("An account already exists with email: {0}")]
    UserExists(String),

    /// No account with this email.
    #[error("No account found with email: {0}")]
    UserNotFound(String),

    /// Password hashing failed.
    #[error("Failed to hash password")]
    PasswordHash,

    /// Database error.
    #[error("Database error: {0}")]
    Database(RepositoryError),
}

/// Create a new admin account.
pub async fn create(email: &str, password: &str) -> Result<(), AdminError> {
    let email = Email::parse(email)?;
    let password_hash = hash_password(password).map_err(|_| AdminError::PasswordHash)?;

    let pool = super::connect().await?;
    let users = PgUserStore::new(pool);

    let user = users
        .create(&email, &password_hash, Role::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => AdminError::Database(other),
        })?;

    tracing::info!("Created admin account {} (id {})", user.email, user.id);
    Ok(())
}

/// Promote an existing account to admin.
pub async fn promote(email: &str) -> Result<(), AdminError> {
    let email = Email::parse(email)?;

    let pool = super::connect().await?;
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));

    let user = users
        .get_by_email(&email)
        .await
        .map_err(AdminError::Database)?
        .ok_or_else(|| AdminError::UserNotFound(email.to_string()))?;

    if user.role.is_admin() {
        tracing::info!("{} is already an admin", user.email);
        return Ok(());
    }

    let user = users
        .set_role(user.id, Role::Admin)
        .await
        .map_err(AdminError::Database)?;

    tracing::info!("Promoted {} to admin", user.email);
    Ok(())
}
