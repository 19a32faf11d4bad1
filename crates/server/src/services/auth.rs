//! Authentication service.
//!
//! Handles registration, password login, and bearer-session validation.
//! Passwords are hashed with Argon2id. Session tokens are opaque random
//! values stored server-side with an expiry; the token itself carries no
//! identity and is never derived from the user ID.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::RngCore;
use thiserror::Error;

use stride_core::{Email, Role};

use crate::db::{RepositoryError, SessionStore, UserStore};
use crate::models::{Session, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Number of random bytes in a session token.
const TOKEN_BYTES: usize = 32;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] stride_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Email already registered.
    #[error("email already registered")]
    DuplicateEmail,

    /// No account for this email.
    #[error("user not found")]
    UserNotFound,

    /// Wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, unknown, or expired.
    #[error("invalid or expired session token")]
    InvalidToken,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Authentication service.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            session_ttl,
        }
    }

    /// Register a new user with email and password.
    ///
    /// New accounts always get the default role; a role supplied by the
    /// caller is never honored. Admins are created via the CLI or by an
    /// existing admin through user management.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, &password_hash, Role::default())
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password, issuing a new session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account matches the email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Session), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &password_hash)?;

        let now = Utc::now();
        let session = Session {
            token: generate_token(),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.sessions.insert(&session).await?;

        Ok((user, session))
    }

    /// Resolve a bearer token to its user.
    ///
    /// Expired sessions are deleted on sight.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown, expired,
    /// or the user behind it no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let session = self
            .sessions
            .get(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if session.is_expired(Utc::now()) {
            self.sessions.delete(token).await?;
            return Err(AuthError::InvalidToken);
        }

        self.users
            .get_by_id(session.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Delete the session behind a token (logout). Unknown tokens are fine.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store operation fails.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.delete(token).await?;
        Ok(())
    }
}

/// Generate an opaque session token from 32 random bytes.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::memory::{MemorySessionStore, MemoryUserStore};

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemorySessionStore::new()),
            Duration::hours(1),
        )
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(a.len() >= 40);
    }

    #[tokio::test]
    async fn test_register_defaults_to_user_role() {
        let auth = service();
        let user = auth.register("shopper@example.com", "hunter22!").await.unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.email.as_str(), "shopper@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let auth = service();
        auth.register("shopper@example.com", "hunter22!").await.unwrap();
        let err = auth
            .register("shopper@example.com", "hunter22!")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let auth = service();
        let err = auth.register("shopper@example.com", "short").await.unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_distinct_from_wrong_password() {
        let auth = service();
        auth.register("shopper@example.com", "hunter22!").await.unwrap();

        let err = auth.login("nobody@example.com", "hunter22!").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));

        let err = auth.login("shopper@example.com", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_issues_valid_session() {
        let auth = service();
        auth.register("shopper@example.com", "hunter22!").await.unwrap();

        let (user, session) = auth.login("shopper@example.com", "hunter22!").await.unwrap();
        assert_eq!(session.user_id, user.id);

        let resolved = auth.authenticate(&session.token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_token() {
        let auth = service();
        let err = auth.authenticate("not-a-token").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_expired_session() {
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let auth = AuthService::new(Arc::clone(&users), Arc::clone(&sessions), Duration::hours(1));

        let user = auth.register("shopper@example.com", "hunter22!").await.unwrap();

        let stale = Session {
            token: "stale".to_owned(),
            user_id: user.id,
            created_at: Utc::now() - Duration::hours(2),
            expires_at: Utc::now() - Duration::hours(1),
        };
        sessions.insert(&stale).await.unwrap();

        let err = auth.authenticate("stale").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
        // expired session is removed on sight
        assert!(sessions.get("stale").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_deletes_session() {
        let auth = service();
        auth.register("shopper@example.com", "hunter22!").await.unwrap();
        let (_, session) = auth.login("shopper@example.com", "hunter22!").await.unwrap();

        auth.logout(&session.token).await.unwrap();
        assert!(matches!(
            auth.authenticate(&session.token).await.unwrap_err(),
            AuthError::InvalidToken
        ));

        // logging out twice is fine
        auth.logout(&session.token).await.unwrap();
    }
}
