//! Catalog seeding command.

use rust_decimal::Decimal;
use thiserror::Error;

use stride_core::Price;
use stride_server::db::postgres::PgProductStore;
use stride_server::db::{ProductStore, RepositoryError};

use super::ConnectError;

/// Sample catalog: (name, price in cents, image).
const SAMPLE_PRODUCTS: &[(&str, i64, &str)] = &[
    ("Court Classic", 14000, "/images/court-classic.png"),
    ("Trail Runner", 20000, "/images/trail-runner.png"),
    ("City Loafer", 16500, "/images/city-loafer.png"),
    ("Track Sprint", 18000, "/images/track-sprint.png"),
];

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Database connection error.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// A sample price failed validation.
    #[error("Invalid sample price: {0}")]
    Price(#[from] stride_core::PriceError),
}

/// Insert the sample catalog. Refuses to run on a non-empty catalog.
pub async fn run() -> Result<(), SeedError> {
    let pool = super::connect().await?;
    let products = PgProductStore::new(pool);

    if !products.list().await?.is_empty() {
        tracing::info!("Catalog is not empty, skipping seed");
        return Ok(());
    }

    for (name, cents, image) in SAMPLE_PRODUCTS {
        let price = Price::new(Decimal::new(*cents, 2))?;
        let product = products.create(name, price, image).await?;
        tracing::info!("Seeded product {} ({})", product.name, product.id);
    }

    tracing::info!("Seeded {} products", SAMPLE_PRODUCTS.len());
    Ok(())
}
