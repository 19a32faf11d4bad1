//! Shared domain types.

pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::{ProductId, UserId};
pub use price::{Price, PriceError};
pub use role::Role;
