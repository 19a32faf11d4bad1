//! Business services between the HTTP layer and the repositories.

pub mod auth;
pub mod catalog;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService, ProductInput};
