//! Order assembly and submission.
//!
//! Submission preconditions (a `Ready` gate covering the cart, one accepted
//! payment method per artisan) are enforced here with the pure rules from
//! `tianguis_core`, so a handler cannot skip them. The downstream
//! collaborators — artisan notification, confirmation email — are stubs:
//! a tracing line stands in for each.

use std::collections::HashMap;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;

use tianguis_core::{
    Artisan, ArtisanGroup, ArtisanId, Cart, CheckoutError, CheckoutGate, OrderId, OrderStatus,
    PaymentMethod, ResolvedAddress, group_by_artisan,
};

use crate::models::ShippingDetails;

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Buyer-facing order number ("ORD-04217").
    pub number: String,
    pub details: ShippingDetails,
    pub address: ResolvedAddress,
    /// Per-artisan groups as they were at submission.
    pub groups: Vec<ArtisanGroup>,
    /// The payment method selected for each artisan.
    pub payments: HashMap<ArtisanId, PaymentMethod>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

/// In-memory store of every order placed since startup.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    inner: Arc<RwLock<Vec<Order>>>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the checkout state and record the order.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::NotReady`] unless the gate is `Ready` for exactly
    /// the cart's artisan set; selection errors per
    /// [`tianguis_core::validate_selections`].
    #[instrument(skip_all, fields(lines = cart.lines().len()))]
    pub async fn place_order(
        &self,
        cart: &Cart,
        gate: &CheckoutGate,
        cart_artisans: &[Artisan],
        selections: HashMap<ArtisanId, PaymentMethod>,
        details: ShippingDetails,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() || !gate.is_ready_for(&cart.artisan_ids()) {
            return Err(CheckoutError::NotReady);
        }
        tianguis_core::validate_selections(cart_artisans, &selections)?;

        let address = gate.resolved_address().ok_or(CheckoutError::NotReady)?.clone();

        let mut orders = self.inner.write().await;
        let order = Order {
            id: OrderId::new(i32::try_from(orders.len() + 1).unwrap_or(i32::MAX)),
            number: generate_order_number(),
            details,
            address,
            groups: group_by_artisan(cart),
            payments: selections,
            total: cart.total(),
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
        };
        orders.push(order.clone());

        // Notification delivery is an external collaborator; log in its place.
        tracing::info!(
            order = %order.number,
            buyer = %order.details.contact.email,
            artisans = order.groups.len(),
            "order placed, confirmation email queued"
        );

        Ok(order)
    }

    /// Orders whose numbers appear in `numbers`, oldest first.
    pub async fn find_by_numbers(&self, numbers: &[String]) -> Vec<Order> {
        let orders = self.inner.read().await;
        orders
            .iter()
            .filter(|order| numbers.contains(&order.number))
            .cloned()
            .collect()
    }
}

/// Buyer-facing order number. Uniqueness is best-effort, like the mock
/// marketplace it replaces; collisions only matter once there is a real
/// order database to enforce them.
fn generate_order_number() -> String {
    let n: u32 = rand::rng().random_range(0..100_000);
    format!("ORD-{n:05}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;
    use tianguis_core::{Email, LineItem, Price, ProductId, ShippingZone};

    fn artisan(id: i32, name: &str) -> Artisan {
        Artisan {
            id: ArtisanId::new(id),
            display_name: name.to_owned(),
            colony: "Centro".to_owned(),
            municipality: "Oaxaca de Juárez".to_owned(),
            state: "Oaxaca".to_owned(),
            shipping_zone: ShippingZone::StateWide,
            payment_methods: vec![PaymentMethod::Cash],
            shipping_policy: String::new(),
        }
    }

    fn cart_for(artisan_id: i32) -> Cart {
        let mut cart = Cart::new();
        cart.add(LineItem {
            product_id: ProductId::new(1),
            name: "Barro negro".to_owned(),
            unit_price: Price::new(dec!(350)).unwrap(),
            quantity: 2,
            artisan_id: ArtisanId::new(artisan_id),
        });
        cart
    }

    fn details() -> ShippingDetails {
        ShippingDetails {
            contact: tianguis_core::BuyerContact {
                full_name: "Ana Cliente".to_owned(),
                email: Email::parse("ana@correo.mx").unwrap(),
                phone: "9511234567".to_owned(),
            },
            street: "Calle Hidalgo 12".to_owned(),
        }
    }

    fn ready_gate(artisans: &[Artisan]) -> CheckoutGate {
        let mut gate = CheckoutGate::new();
        let request = gate.submit_postal_code("68000").unwrap();
        gate.apply_lookup(
            request.seq,
            Ok(ResolvedAddress {
                postal_code: "68000".parse().unwrap(),
                colony: "Centro".to_owned(),
                municipality: "Oaxaca de Juárez".to_owned(),
                state: "Oaxaca".to_owned(),
            }),
            artisans,
        );
        gate
    }

    #[tokio::test]
    async fn test_place_order_happy_path() {
        let store = OrderStore::new();
        let artisans = vec![artisan(1, "María")];
        let cart = cart_for(1);
        let gate = ready_gate(&artisans);
        let selections = HashMap::from([(ArtisanId::new(1), PaymentMethod::Cash)]);

        let order = store
            .place_order(&cart, &gate, &artisans, selections, details())
            .await
            .unwrap();

        assert!(order.number.starts_with("ORD-"));
        assert_eq!(order.total, dec!(700));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.groups.len(), 1);

        let found = store.find_by_numbers(&[order.number.clone()]).await;
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_place_order_requires_ready_gate() {
        let store = OrderStore::new();
        let artisans = vec![artisan(1, "María")];
        let cart = cart_for(1);
        let gate = CheckoutGate::new();
        let selections = HashMap::from([(ArtisanId::new(1), PaymentMethod::Cash)]);

        let err = store
            .place_order(&cart, &gate, &artisans, selections, details())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::NotReady);
    }

    #[tokio::test]
    async fn test_place_order_rejects_missing_selection() {
        let store = OrderStore::new();
        let artisans = vec![artisan(1, "María")];
        let cart = cart_for(1);
        let gate = ready_gate(&artisans);

        let err = store
            .place_order(&cart, &gate, &artisans, HashMap::new(), details())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::IncompleteSelection { .. }));
    }

    #[tokio::test]
    async fn test_place_order_rejects_stale_gate_after_cart_change() {
        let store = OrderStore::new();
        let artisans = vec![artisan(1, "María")];
        let gate = ready_gate(&artisans);

        // A second artisan's items were added after verification.
        let mut cart = cart_for(1);
        cart.add(LineItem {
            product_id: ProductId::new(2),
            name: "Textil".to_owned(),
            unit_price: Price::new(dec!(500)).unwrap(),
            quantity: 1,
            artisan_id: ArtisanId::new(2),
        });

        let selections = HashMap::from([
            (ArtisanId::new(1), PaymentMethod::Cash),
            (ArtisanId::new(2), PaymentMethod::Cash),
        ]);
        let both = vec![artisan(1, "María"), artisan(2, "Juan")];
        let err = store
            .place_order(&cart, &gate, &both, selections, details())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::NotReady);
    }
}
