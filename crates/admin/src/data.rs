//! In-memory marketplace data for the dashboards.
//!
//! Seeded at startup; profile edits and order-status changes mutate it for
//! the process lifetime. There is no persistence layer.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, dec};
use thiserror::Error;
use tokio::sync::RwLock;

use tianguis_core::{
    Artisan, ArtisanId, OrderId, OrderStatus, PaymentMethod, Price, Product, ProductId,
    ShippingZone,
};

/// Errors raised by dashboard mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("unknown artisan {0}")]
    UnknownArtisan(ArtisanId),
    #[error("unknown order {0}")]
    UnknownOrder(OrderId),
    #[error("order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("an artisan must accept at least one payment method")]
    NoPaymentMethods,
}

/// One artisan's view of a placed order.
#[derive(Debug, Clone)]
pub struct SellerOrder {
    pub id: OrderId,
    pub number: String,
    pub buyer_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub total: Decimal,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub artisan_id: ArtisanId,
}

/// Artisan profile fields editable from the dashboard.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub shipping_zone: ShippingZone,
    pub payment_methods: Vec<PaymentMethod>,
    pub shipping_policy: String,
}

/// Shared, mutable marketplace data.
#[derive(Clone)]
pub struct MarketData {
    inner: Arc<RwLock<MarketInner>>,
}

struct MarketInner {
    artisans: Vec<Artisan>,
    products: Vec<Product>,
    orders: Vec<SellerOrder>,
}

impl MarketData {
    /// Build the seeded dataset.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MarketInner {
                artisans: seed_artisans(),
                products: seed_products(),
                orders: seed_orders(),
            })),
        }
    }

    pub async fn artisans(&self) -> Vec<Artisan> {
        self.inner.read().await.artisans.clone()
    }

    pub async fn artisan(&self, id: ArtisanId) -> Option<Artisan> {
        self.inner
            .read()
            .await
            .artisans
            .iter()
            .find(|artisan| artisan.id == id)
            .cloned()
    }

    pub async fn products_for(&self, id: ArtisanId) -> Vec<Product> {
        self.inner
            .read()
            .await
            .products
            .iter()
            .filter(|product| product.artisan_id == id)
            .cloned()
            .collect()
    }

    pub async fn orders_for(&self, id: ArtisanId) -> Vec<SellerOrder> {
        self.inner
            .read()
            .await
            .orders
            .iter()
            .filter(|order| order.artisan_id == id)
            .cloned()
            .collect()
    }

    pub async fn all_orders(&self) -> Vec<SellerOrder> {
        self.inner.read().await.orders.clone()
    }

    pub async fn product_count(&self, id: ArtisanId) -> usize {
        self.inner
            .read()
            .await
            .products
            .iter()
            .filter(|product| product.artisan_id == id)
            .count()
    }

    /// Apply a profile edit from the dashboard form.
    ///
    /// # Errors
    ///
    /// [`DataError::UnknownArtisan`] or [`DataError::NoPaymentMethods`].
    pub async fn update_profile(
        &self,
        id: ArtisanId,
        update: ProfileUpdate,
    ) -> Result<(), DataError> {
        if update.payment_methods.is_empty() {
            return Err(DataError::NoPaymentMethods);
        }
        let mut inner = self.inner.write().await;
        let artisan = inner
            .artisans
            .iter_mut()
            .find(|artisan| artisan.id == id)
            .ok_or(DataError::UnknownArtisan(id))?;
        artisan.shipping_zone = update.shipping_zone;
        artisan.payment_methods = update.payment_methods;
        artisan.shipping_policy = update.shipping_policy;
        Ok(())
    }

    /// Move one of the artisan's orders to a new status.
    ///
    /// # Errors
    ///
    /// [`DataError::UnknownOrder`] if the order does not belong to the
    /// artisan, [`DataError::InvalidTransition`] if the status change is
    /// not allowed.
    pub async fn advance_order(
        &self,
        artisan_id: ArtisanId,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<(), DataError> {
        let mut inner = self.inner.write().await;
        let order = inner
            .orders
            .iter_mut()
            .find(|order| order.id == order_id && order.artisan_id == artisan_id)
            .ok_or(DataError::UnknownOrder(order_id))?;
        if !order.status.can_transition_to(next) {
            return Err(DataError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }
        order.status = next;
        Ok(())
    }
}

fn price(amount: Decimal) -> Price {
    Price::new(amount).unwrap_or(Price::ZERO)
}

fn seed_artisans() -> Vec<Artisan> {
    vec![
        Artisan {
            id: ArtisanId::new(1),
            display_name: "María González".to_owned(),
            colony: "Centro".to_owned(),
            municipality: "San Bartolo Coyotepec".to_owned(),
            state: "Oaxaca".to_owned(),
            shipping_zone: ShippingZone::MunicipalityWide,
            payment_methods: vec![PaymentMethod::Cash, PaymentMethod::Card],
            shipping_policy: "Envío gratuito en mi municipio. Envíos a otros estados tienen costo adicional.".to_owned(),
        },
        Artisan {
            id: ArtisanId::new(2),
            display_name: "Juan Pérez".to_owned(),
            colony: "Centro".to_owned(),
            municipality: "Teotitlán del Valle".to_owned(),
            state: "Oaxaca".to_owned(),
            shipping_zone: ShippingZone::StateWide,
            payment_methods: vec![PaymentMethod::Cash],
            shipping_policy: "Envío con costo adicional según la distancia.".to_owned(),
        },
        Artisan {
            id: ArtisanId::new(3),
            display_name: "Lucía Ramírez".to_owned(),
            colony: "Centro".to_owned(),
            municipality: "San Martín Tilcajete".to_owned(),
            state: "Oaxaca".to_owned(),
            shipping_zone: ShippingZone::ColonyOnly,
            payment_methods: vec![PaymentMethod::Cash, PaymentMethod::Card],
            shipping_policy: "Entrega personal dentro de mi colonia.".to_owned(),
        },
        Artisan {
            id: ArtisanId::new(4),
            display_name: "Pedro Sánchez".to_owned(),
            colony: "Reforma".to_owned(),
            municipality: "Oaxaca de Juárez".to_owned(),
            state: "Oaxaca".to_owned(),
            shipping_zone: ShippingZone::MunicipalityWide,
            payment_methods: vec![PaymentMethod::Card],
            shipping_policy: "Entregas los fines de semana en toda la ciudad.".to_owned(),
        },
    ]
}

fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            name: "Artesanía de Barro Negro".to_owned(),
            description: "Pieza de barro negro pulido, torneada y bruñida a mano.".to_owned(),
            category: "barro".to_owned(),
            price: price(dec!(350)),
            image_url: "https://via.placeholder.com/400x400?text=Barro+Negro".to_owned(),
            stock: 8,
            artisan_id: ArtisanId::new(1),
        },
        Product {
            id: ProductId::new(2),
            name: "Cántaro de Barro Negro".to_owned(),
            description: "Cántaro decorativo con calados tradicionales.".to_owned(),
            category: "barro".to_owned(),
            price: price(dec!(520)),
            image_url: "https://via.placeholder.com/400x400?text=Cantaro".to_owned(),
            stock: 3,
            artisan_id: ArtisanId::new(1),
        },
        Product {
            id: ProductId::new(3),
            name: "Textil Bordado a Mano".to_owned(),
            description: "Tapete de lana teñida con grana cochinilla y añil.".to_owned(),
            category: "textiles".to_owned(),
            price: price(dec!(500)),
            image_url: "https://via.placeholder.com/400x400?text=Textil".to_owned(),
            stock: 5,
            artisan_id: ArtisanId::new(2),
        },
        Product {
            id: ProductId::new(5),
            name: "Alebrije Tallado en Copal".to_owned(),
            description: "Figura fantástica tallada en madera de copal.".to_owned(),
            category: "alebrijes".to_owned(),
            price: price(dec!(750)),
            image_url: "https://via.placeholder.com/400x400?text=Alebrije".to_owned(),
            stock: 4,
            artisan_id: ArtisanId::new(3),
        },
        Product {
            id: ProductId::new(7),
            name: "Canasta de Palma Tejida".to_owned(),
            description: "Canasta de palma natural tejida en espiral.".to_owned(),
            category: "cestería".to_owned(),
            price: price(dec!(180)),
            image_url: "https://via.placeholder.com/400x400?text=Canasta".to_owned(),
            stock: 12,
            artisan_id: ArtisanId::new(4),
        },
    ]
}

fn seed_orders() -> Vec<SellerOrder> {
    let now = Utc::now();
    vec![
        SellerOrder {
            id: OrderId::new(1),
            number: "ORD-04217".to_owned(),
            buyer_name: "Ana López".to_owned(),
            product_name: "Artesanía de Barro Negro".to_owned(),
            quantity: 1,
            total: dec!(350),
            status: OrderStatus::Pending,
            placed_at: now - Duration::hours(3),
            artisan_id: ArtisanId::new(1),
        },
        SellerOrder {
            id: OrderId::new(2),
            number: "ORD-03981".to_owned(),
            buyer_name: "Carlos Mendoza".to_owned(),
            product_name: "Cántaro de Barro Negro".to_owned(),
            quantity: 2,
            total: dec!(1040),
            status: OrderStatus::Confirmed,
            placed_at: now - Duration::days(1),
            artisan_id: ArtisanId::new(1),
        },
        SellerOrder {
            id: OrderId::new(3),
            number: "ORD-03544".to_owned(),
            buyer_name: "Sofía Hernández".to_owned(),
            product_name: "Textil Bordado a Mano".to_owned(),
            quantity: 1,
            total: dec!(500),
            status: OrderStatus::Shipped,
            placed_at: now - Duration::days(3),
            artisan_id: ArtisanId::new(2),
        },
        SellerOrder {
            id: OrderId::new(4),
            number: "ORD-02970".to_owned(),
            buyer_name: "Diego Cruz".to_owned(),
            product_name: "Alebrije Tallado en Copal".to_owned(),
            quantity: 1,
            total: dec!(750),
            status: OrderStatus::Delivered,
            placed_at: now - Duration::days(9),
            artisan_id: ArtisanId::new(3),
        },
        SellerOrder {
            id: OrderId::new(5),
            number: "ORD-02741".to_owned(),
            buyer_name: "Elena Torres".to_owned(),
            product_name: "Canasta de Palma Tejida".to_owned(),
            quantity: 3,
            total: dec!(540),
            status: OrderStatus::Cancelled,
            placed_at: now - Duration::days(12),
            artisan_id: ArtisanId::new(4),
        },
        SellerOrder {
            id: OrderId::new(6),
            number: "ORD-02512".to_owned(),
            buyer_name: "Jorge Ramírez".to_owned(),
            product_name: "Textil Bordado a Mano".to_owned(),
            quantity: 2,
            total: dec!(1000),
            status: OrderStatus::Delivered,
            placed_at: now - Duration::days(15),
            artisan_id: ArtisanId::new(2),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_update_requires_a_payment_method() {
        let data = MarketData::seed();
        let err = data
            .update_profile(
                ArtisanId::new(1),
                ProfileUpdate {
                    shipping_zone: ShippingZone::StateWide,
                    payment_methods: vec![],
                    shipping_policy: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, DataError::NoPaymentMethods);
    }

    #[tokio::test]
    async fn test_profile_update_applies() {
        let data = MarketData::seed();
        data.update_profile(
            ArtisanId::new(1),
            ProfileUpdate {
                shipping_zone: ShippingZone::StateWide,
                payment_methods: vec![PaymentMethod::Card],
                shipping_policy: "Nueva política".to_owned(),
            },
        )
        .await
        .unwrap();

        let artisan = data.artisan(ArtisanId::new(1)).await.unwrap();
        assert_eq!(artisan.shipping_zone, ShippingZone::StateWide);
        assert_eq!(artisan.payment_methods, vec![PaymentMethod::Card]);
        assert_eq!(artisan.shipping_policy, "Nueva política");
    }

    #[tokio::test]
    async fn test_advance_order_follows_transitions() {
        let data = MarketData::seed();
        // Pending -> Confirmed is allowed.
        data.advance_order(ArtisanId::new(1), OrderId::new(1), OrderStatus::Confirmed)
            .await
            .unwrap();
        // Delivered is terminal.
        let err = data
            .advance_order(ArtisanId::new(3), OrderId::new(4), OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_advance_order_checks_ownership() {
        let data = MarketData::seed();
        // Order 3 belongs to artisan 2, not artisan 1.
        let err = data
            .advance_order(ArtisanId::new(1), OrderId::new(3), OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert_eq!(err, DataError::UnknownOrder(OrderId::new(3)));
    }
}
