//! Shopping cart.
//!
//! The cart lives entirely on the client, persisted through [`KvStore`]
//! under [`CART_KEY`]. Line items are keyed by product and size: adding the
//! same shoe in the same size merges quantities, the same shoe in another
//! size is its own line.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stride_core::{Price, ProductId};

use crate::kv::{CART_KEY, KvStore};
use crate::models::Product;

/// Smallest stocked EU shoe size.
const MIN_SIZE: u32 = 37;

/// Largest stocked EU shoe size.
const MAX_SIZE: u32 = 46;

/// How long a [`Notice`] stays visible.
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Errors from cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No size was selected.
    #[error("a size must be selected")]
    MissingSize,

    /// Numeric size outside the stocked range.
    #[error("size {0} is out of range ({MIN_SIZE}-{MAX_SIZE})")]
    SizeOutOfRange(u32),

    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// One cart line: a product in a specific size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub size: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// Line subtotal: price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price.amount() * Decimal::from(self.quantity)
    }
}

/// A transient confirmation message that hides itself after a few seconds.
#[derive(Debug, Clone)]
pub struct Notice {
    message: String,
    shown_at: Instant,
}

impl Notice {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    /// The message to display.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the notice should still be shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.shown_at.elapsed() < NOTICE_TTL
    }
}

/// Cart reducer over a key-value store.
pub struct Cart {
    store: Arc<dyn KvStore>,
}

impl Cart {
    /// Create a cart over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Current line items. Corrupt stored data reads as an empty cart.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        let Some(raw) = self.store.get(CART_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(%err, "discarding corrupt cart data");
                self.store.remove(CART_KEY);
                Vec::new()
            }
        }
    }

    /// Add a product in a given size.
    ///
    /// An existing line for the same product and size has its quantity
    /// increased; otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingSize` for an empty size,
    /// `CartError::SizeOutOfRange` for a numeric size outside the stocked
    /// range, and `CartError::ZeroQuantity` for a zero quantity.
    pub fn add(&self, product: &Product, size: &str, quantity: u32) -> Result<(), CartError> {
        let size = validate_size(size)?;
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let mut items = self.items();
        match items
            .iter_mut()
            .find(|item| item.product_id == product.id && item.size == size)
        {
            Some(item) => item.quantity += quantity,
            None => items.push(CartLineItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                size,
                quantity,
            }),
        }

        self.save(&items);
        Ok(())
    }

    /// Decrease the quantity of a line by one, dropping the line when it
    /// reaches zero. Absent lines are a no-op.
    pub fn remove_one(&self, product_id: ProductId, size: &str) {
        let mut items = self.items();

        let Some(index) = items
            .iter()
            .position(|item| item.product_id == product_id && item.size == size)
        else {
            return;
        };

        if items[index].quantity > 1 {
            items[index].quantity -= 1;
        } else {
            items.remove(index);
        }

        self.save(&items);
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items().iter().map(|item| item.quantity).sum()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items().iter().map(CartLineItem::subtotal).sum()
    }

    /// Empty the cart, returning the checkout confirmation notice.
    pub fn clear(&self) -> Notice {
        self.store.remove(CART_KEY);
        Notice::new("Thank you for your purchase!")
    }

    fn save(&self, items: &[CartLineItem]) {
        if let Ok(json) = serde_json::to_string(items) {
            self.store.set(CART_KEY, &json);
        }
    }
}

/// Validate a size selection. Non-numeric sizes (e.g. "one size") pass
/// through; numeric sizes must fall inside the stocked range.
fn validate_size(size: &str) -> Result<String, CartError> {
    let size = size.trim();
    if size.is_empty() {
        return Err(CartError::MissingSize);
    }

    if let Ok(numeric) = size.parse::<u32>()
        && !(MIN_SIZE..=MAX_SIZE).contains(&numeric)
    {
        return Err(CartError::SizeOutOfRange(numeric));
    }

    Ok(size.to_owned())
}
