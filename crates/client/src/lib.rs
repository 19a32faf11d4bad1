//! Stride client library.
//!
//! Client-side building blocks for a shop frontend: a pluggable key-value
//! store standing in for browser storage, a cart reducer, a cached session
//! view, and an async API client for the Stride server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod kv;
pub mod models;
pub mod session;

pub use api::{ApiClient, ClientError};
pub use cart::{Cart, CartError, CartLineItem, Notice};
pub use kv::{KvStore, MemoryKvStore};
pub use models::Product;
pub use session::SessionCache;
