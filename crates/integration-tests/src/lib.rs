//! Integration tests for Stride.
//!
//! The tests in `tests/` exercise a live server through [`stride_client`]
//! and are marked `#[ignore]` so the default test run stays hermetic.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p stride-cli -- migrate
//!
//! # Seed an admin account for the admin tests
//! cargo run -p stride-cli -- admin create -e admin@stride.test -p "integration-pass-1"
//!
//! # Start the server, then run the ignored tests
//! cargo run -p stride-server &
//! cargo test -p stride-integration-tests -- --ignored
//! ```

use std::sync::Arc;

use stride_client::{ApiClient, MemoryKvStore};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STRIDE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// A fresh API client with its own in-memory storage.
#[must_use]
pub fn client() -> ApiClient {
    ApiClient::new(base_url(), Arc::new(MemoryKvStore::new()))
}

/// A unique email for this test run, so reruns don't collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@stride.test", uuid::Uuid::new_v4())
}
