//! Async API client for the Stride server.
//!
//! Thin wrapper over `reqwest` that speaks the server's JSON contract,
//! attaches the cached bearer token, and keeps the local session cache in
//! step with login and logout.

use std::sync::Arc;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use stride_core::{ProductId, Role, UserId};

use crate::kv::KvStore;
use crate::models::{Account, Envelope, ErrorBody, LoginResponse, Product};
use crate::session::{SessionCache, SessionUser};

/// Errors from API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached.
    #[error("Unable to connect to server.")]
    Connection(#[source] reqwest::Error),

    /// The server rejected the request.
    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response from server")]
    Decode(#[source] reqwest::Error),
}

/// API client bound to a server base URL and a local key-value store.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionCache,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:3000`).
    #[must_use]
    pub fn new(base_url: impl Into<String>, store: Arc<dyn KvStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http: reqwest::Client::new(),
            base_url,
            session: SessionCache::new(store),
        }
    }

    /// The session cache backing this client.
    #[must_use]
    pub fn session(&self) -> &SessionCache {
        &self.session
    }

    /// Register a new account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on validation failures or a duplicate
    /// email.
    pub async fn register(&self, email: &str, password: &str) -> Result<Account, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        parse(response).await
    }

    /// Sign in, caching the session user and token locally.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with a `404` status for an unknown email
    /// and `401` for a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        let login: LoginResponse = parse(response).await?;
        let user = SessionUser {
            id: login.id,
            email: login.email.to_string(),
            role: login.role,
        };
        self.session.store(&user, &login.token);

        Ok(user)
    }

    /// Sign out. The local cache is cleared even if the server call fails.
    pub async fn logout(&self) {
        if let Some(token) = self.session.token() {
            let result = self
                .http
                .post(self.url("/auth/logout"))
                .bearer_auth(&token)
                .send()
                .await;
            if let Err(err) = result {
                tracing::warn!(%err, "logout request failed; clearing local session anyway");
            }
        }

        self.session.clear();
    }

    /// Fetch the account behind the cached token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with `401` when signed out or the token
    /// has expired.
    pub async fn me(&self) -> Result<Account, ClientError> {
        let response = self
            .authed(self.http.get(self.url("/auth/me")))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        parse(response).await
    }

    /// Fetch the product catalog. Public.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Connection` if the server is unreachable.
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self
            .http
            .get(self.url("/products"))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        parse_envelope(response).await
    }

    /// Create a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on validation failures or missing admin
    /// rights.
    pub async fn create_product(
        &self,
        name: &str,
        price: Decimal,
        image: &str,
    ) -> Result<Product, ClientError> {
        let response = self
            .authed(self.http.post(self.url("/products")))
            .json(&json!({ "name": name, "price": price, "image": image }))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        parse_envelope(response).await
    }

    /// Replace all fields of a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` if the product does not exist or the
    /// fields are invalid.
    pub async fn update_product(
        &self,
        id: ProductId,
        name: &str,
        price: Decimal,
        image: &str,
    ) -> Result<Product, ClientError> {
        let response = self
            .authed(self.http.patch(self.url("/products")))
            .json(&json!({ "id": id, "name": name, "price": price, "image": image }))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        parse_envelope(response).await
    }

    /// Delete a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` if the product does not exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        let response = self
            .authed(self.http.delete(self.url("/products")))
            .json(&json!({ "id": id }))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        check_error(response).await?;
        Ok(())
    }

    /// List all accounts. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with `403` for non-admin callers.
    pub async fn users(&self) -> Result<Vec<Account>, ClientError> {
        let response = self
            .authed(self.http.get(self.url("/users")))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        parse_envelope(response).await
    }

    /// Change an account's role. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` if the target account does not exist.
    pub async fn update_role(&self, user_id: UserId, role: Role) -> Result<Account, ClientError> {
        let response = self
            .authed(self.http.patch(self.url("/users")))
            .json(&json!({ "user_id": user_id, "role": role }))
            .send()
            .await
            .map_err(ClientError::Connection)?;

        parse_envelope(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Surface non-2xx responses as `ClientError::Api` with the server message.
async fn check_error(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map_or_else(|_| status.to_string(), |body| body.message);

    Err(ClientError::Api { status, message })
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    check_error(response)
        .await?
        .json()
        .await
        .map_err(ClientError::Decode)
}

async fn parse_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let envelope: Envelope<T> = parse(response).await?;
    envelope.data.ok_or(ClientError::Api {
        status: StatusCode::OK,
        message: envelope.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/", Arc::new(MemoryKvStore::new()));
        assert_eq!(client.url("/products"), "http://localhost:3000/products");
    }

    #[test]
    fn test_connection_error_message_is_friendly() {
        // the Display string is what UIs show on a dead server
        assert_eq!(
            ClientError::Api {
                status: StatusCode::BAD_REQUEST,
                message: "price must be positive".to_owned()
            }
            .to_string(),
            "price must be positive"
        );
    }
}
