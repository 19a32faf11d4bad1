//! In-memory repository implementations.
//!
//! Used by tests and local demos. Single-process only; every mutation takes
//! a short mutex critical section with no await inside it.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use stride_core::{Email, Price, ProductId, Role, UserId};

use super::{ProductStore, RepositoryError, SessionStore, UserStore};
use crate::models::{Product, Session, User};

struct UserRecord {
    user: User,
    password_hash: String,
}

/// In-memory user store.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Vec<UserRecord>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let records = self.inner.lock().expect("lock poisoned");
        Ok(records
            .iter()
            .find(|r| r.user.email == *email)
            .map(|r| r.user.clone()))
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let records = self.inner.lock().expect("lock poisoned");
        Ok(records
            .iter()
            .find(|r| r.user.id == id)
            .map(|r| r.user.clone()))
    }

    async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let mut records = self.inner.lock().expect("lock poisoned");

        if records.iter().any(|r| r.user.email == *email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let next_id = i32::try_from(records.len())
            .map_err(|_| RepositoryError::DataCorruption("id space exhausted".to_owned()))?
            + 1;

        let user = User {
            id: UserId::new(next_id),
            email: email.clone(),
            role,
            created_at: Utc::now(),
        };

        records.push(UserRecord {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });

        Ok(user)
    }

    async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let records = self.inner.lock().expect("lock poisoned");
        Ok(records
            .iter()
            .find(|r| r.user.email == *email)
            .map(|r| (r.user.clone(), r.password_hash.clone())))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let records = self.inner.lock().expect("lock poisoned");
        Ok(records.iter().map(|r| r.user.clone()).collect())
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<User, RepositoryError> {
        let mut records = self.inner.lock().expect("lock poisoned");
        let record = records
            .iter_mut()
            .find(|r| r.user.id == id)
            .ok_or(RepositoryError::NotFound)?;

        record.user.role = role;
        Ok(record.user.clone())
    }
}

/// In-memory product store.
#[derive(Default)]
pub struct MemoryProductStore {
    inner: Mutex<MemoryProducts>,
}

#[derive(Default)]
struct MemoryProducts {
    products: Vec<Product>,
    next_id: i32,
}

impl MemoryProductStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner.products.clone())
    }

    async fn create(
        &self,
        name: &str,
        price: Price,
        image: &str,
    ) -> Result<Product, RepositoryError> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        inner.next_id += 1;

        let product = Product {
            id: ProductId::new(inner.next_id),
            name: name.to_owned(),
            price,
            image: image.to_owned(),
        };

        inner.products.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        name: &str,
        price: Price,
        image: &str,
    ) -> Result<Product, RepositoryError> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        product.name = name.to_owned();
        product.price = price;
        product.image = image.to_owned();
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);

        if inner.products.len() == before {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// In-memory session store.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<HashMap<String, Session>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: &Session) -> Result<(), RepositoryError> {
        let mut sessions = self.inner.lock().expect("lock poisoned");
        sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, RepositoryError> {
        let sessions = self.inner.lock().expect("lock poisoned");
        Ok(sessions.get(token).cloned())
    }

    async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
        let mut sessions = self.inner.lock().expect("lock poisoned");
        sessions.remove(token);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn price(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2)).unwrap()
    }

    #[tokio::test]
    async fn test_user_create_and_lookup() {
        let store = MemoryUserStore::new();
        let email = Email::parse("a@b.c").unwrap();

        let user = store.create(&email, "hash", Role::User).await.unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.role, Role::User);

        let found = store.get_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let (_, hash) = store.get_with_password_hash(&email).await.unwrap().unwrap();
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn test_user_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        let email = Email::parse("a@b.c").unwrap();

        store.create(&email, "hash", Role::User).await.unwrap();
        let err = store.create(&email, "hash2", Role::User).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_set_role_missing_user() {
        let store = MemoryUserStore::new();
        let err = store.set_role(UserId::new(9), Role::Admin).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_product_crud_preserves_insertion_order() {
        let store = MemoryProductStore::new();
        let a = store.create("Runner", price(14000), "/a.png").await.unwrap();
        let b = store.create("Trail", price(20000), "/b.png").await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![a.clone(), b.clone()]);

        store.delete(a.id).await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![b]);

        let err = store.delete(a.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = MemorySessionStore::new();
        let session = Session {
            token: "tok".to_owned(),
            user_id: UserId::new(1),
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        };

        store.insert(&session).await.unwrap();
        assert!(store.get("tok").await.unwrap().is_some());

        store.delete("tok").await.unwrap();
        assert!(store.get("tok").await.unwrap().is_none());
        // deleting again is a no-op
        store.delete("tok").await.unwrap();
    }
}
