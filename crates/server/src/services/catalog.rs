//! Catalog service.
//!
//! CRUD over products with field validation in front of the repository.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use stride_core::{Price, ProductId};

use crate::db::{ProductStore, RepositoryError};
use crate::models::Product;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad or missing input fields.
    #[error("{0}")]
    Validation(String),

    /// No product with the given ID.
    #[error("product not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Raw product fields as submitted by the client.
///
/// Fields are optional so that missing values surface as a validation
/// error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
}

impl ProductInput {
    /// Validate and normalize the input.
    fn validate(self) -> Result<(String, Price, String), CatalogError> {
        let name = self
            .name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CatalogError::Validation("name must be a non-empty string".to_owned()))?;

        let price = self
            .price
            .ok_or_else(|| CatalogError::Validation("price is required".to_owned()))
            .and_then(|p| {
                Price::new(p).map_err(|e| CatalogError::Validation(e.to_string()))
            })?;

        let image = self
            .image
            .map(|i| i.trim().to_owned())
            .filter(|i| !i.is_empty())
            .ok_or_else(|| CatalogError::Validation("image must be a non-empty string".to_owned()))?;

        Ok((name, price, image))
    }
}

/// Catalog service.
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// List all products in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store operation fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` on empty name/image or
    /// non-positive price.
    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let (name, price, image) = input.validate()?;
        Ok(self.products.create(&name, price, &image).await?)
    }

    /// Replace all fields of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the ID is absent and
    /// `CatalogError::Validation` on bad fields.
    pub async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, CatalogError> {
        let (name, price, image) = input.validate()?;
        self.products
            .update(id, &name, price, &image)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CatalogError::NotFound,
                other => CatalogError::Repository(other),
            })
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the ID is absent.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        self.products.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound,
            other => CatalogError::Repository(other),
        })
    }
}
