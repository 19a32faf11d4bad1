//! Wire types shared by the API client.

use serde::{Deserialize, Serialize};

use stride_core::{Email, Price, ProductId, Role, UserId};

/// A catalog product as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
}

/// A user account as returned by the admin user list.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
}

/// Login response from the server.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
    pub token: String,
}

/// The `{ success, data, message }` envelope used by catalog and user
/// management responses.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

/// Error body returned on failures.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
