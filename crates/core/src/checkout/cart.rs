//! The cart and its per-artisan grouping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ArtisanId, Price, ProductId};

/// One cart line: a product at a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    /// Product name snapshot, so the cart renders without a catalog lookup.
    pub name: String,
    pub unit_price: Price,
    /// Always ≥ 1 while the line is in a cart.
    pub quantity: u32,
    pub artisan_id: ArtisanId,
}

impl LineItem {
    /// Extended price: `unit_price × quantity`.
    #[must_use]
    pub fn extended(&self) -> Decimal {
        self.unit_price.extended(self.quantity)
    }
}

/// An ordered collection of line items, created empty at session start and
/// cleared on successful order submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Add an item. If the product is already in the cart the quantities
    /// are merged; a zero-quantity item is ignored.
    pub fn add(&mut self, item: LineItem) {
        if item.quantity == 0 {
            return;
        }
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            existing.quantity += item.quantity;
        } else {
            self.lines.push(item);
        }
    }

    /// Set the quantity of a line. Zero removes the line; an unknown
    /// product id is a no-op.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
        } else if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity;
        }
    }

    /// Remove a line by product id.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Empty the cart (successful order submission).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of extended prices over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(LineItem::extended).sum()
    }

    /// Distinct artisan ids in first-seen order.
    #[must_use]
    pub fn artisan_ids(&self) -> Vec<ArtisanId> {
        let mut ids = Vec::new();
        for line in &self.lines {
            if !ids.contains(&line.artisan_id) {
                ids.push(line.artisan_id);
            }
        }
        ids
    }
}

/// The subset of a cart belonging to one artisan, with its own subtotal.
///
/// Derived, never stored: recomputed from the cart on every use so the
/// groups can never go stale relative to the lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtisanGroup {
    pub artisan_id: ArtisanId,
    /// Lines for this artisan, in cart order.
    pub items: Vec<LineItem>,
    /// Sum of extended prices over `items`.
    pub subtotal: Decimal,
}

/// Split a cart into per-artisan groups, preserving first-seen artisan
/// order. Pure and idempotent; an empty cart yields no groups.
#[must_use]
pub fn group_by_artisan(cart: &Cart) -> Vec<ArtisanGroup> {
    let mut groups: Vec<ArtisanGroup> = Vec::new();
    for line in cart.lines() {
        match groups
            .iter_mut()
            .find(|group| group.artisan_id == line.artisan_id)
        {
            Some(group) => {
                group.subtotal += line.extended();
                group.items.push(line.clone());
            }
            None => groups.push(ArtisanGroup {
                artisan_id: line.artisan_id,
                subtotal: line.extended(),
                items: vec![line.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn line(product: i32, artisan: i32, price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(product),
            name: format!("producto-{product}"),
            unit_price: Price::new(price).unwrap(),
            quantity,
            artisan_id: ArtisanId::new(artisan),
        }
    }

    fn two_artisan_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(line(1, 1, dec!(350), 1));
        cart.add(line(2, 2, dec!(500), 2));
        cart.add(line(3, 1, dec!(120), 3));
        cart
    }

    #[test]
    fn test_empty_cart_has_no_groups() {
        assert!(group_by_artisan(&Cart::new()).is_empty());
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(line(1, 1, dec!(350), 1));
        cart.add(line(1, 1, dec!(350), 2));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_ignores_zero_quantity() {
        let mut cart = Cart::new();
        cart.add(line(1, 1, dec!(350), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = two_artisan_cart();
        cart.set_quantity(ProductId::new(2), 0);
        assert!(
            cart.lines()
                .iter()
                .all(|l| l.product_id != ProductId::new(2))
        );
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let groups = group_by_artisan(&two_artisan_cart());
        let order: Vec<i32> = groups.iter().map(|g| g.artisan_id.as_i32()).collect();
        assert_eq!(order, vec![1, 2]);
        // Artisan 1's lines keep cart order.
        let first = groups.first().unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items.first().unwrap().product_id, ProductId::new(1));
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let cart = two_artisan_cart();
        assert_eq!(group_by_artisan(&cart), group_by_artisan(&cart));
    }

    #[test]
    fn test_subtotals_sum_to_cart_total() {
        let cart = two_artisan_cart();
        let groups = group_by_artisan(&cart);
        let group_sum: Decimal = groups.iter().map(|g| g.subtotal).sum();
        assert_eq!(group_sum, cart.total());
        assert_eq!(cart.total(), dec!(1710)); // 350 + 1000 + 360
    }

    #[test]
    fn test_subtotals_sum_after_mutations() {
        let mut cart = two_artisan_cart();
        cart.set_quantity(ProductId::new(3), 1);
        cart.remove(ProductId::new(2));
        let group_sum: Decimal = group_by_artisan(&cart).iter().map(|g| g.subtotal).sum();
        assert_eq!(group_sum, cart.total());
    }

    #[test]
    fn test_artisan_ids_first_seen() {
        assert_eq!(
            two_artisan_cart().artisan_ids(),
            vec![ArtisanId::new(1), ArtisanId::new(2)]
        );
    }

    #[test]
    fn test_clear() {
        let mut cart = two_artisan_cart();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
