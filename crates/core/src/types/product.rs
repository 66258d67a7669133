//! Product record.

use serde::{Deserialize, Serialize};

use super::id::{ArtisanId, ProductId};
use super::price::Price;

/// A product listed by an artisan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Category slug shown as a catalog filter ("barro", "textiles", ...).
    pub category: String,
    pub price: Price,
    pub image_url: String,
    /// Units available. Zero means the product cannot be added to a cart.
    pub stock: u32,
    /// The artisan who owns this listing.
    pub artisan_id: ArtisanId,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
