//! In-memory catalog of artisans and products.
//!
//! There is no persistence layer: the catalog is seeded at startup and
//! read-only for the storefront's lifetime. Seed data mirrors the kind of
//! inventory the marketplace launches with (Oaxacan crafts).

use rust_decimal::{Decimal, dec};
use tianguis_core::{Artisan, ArtisanId, PaymentMethod, Price, Product, ProductId, ShippingZone};

/// Read-only artisan and product lookups.
#[derive(Debug, Clone)]
pub struct Catalog {
    artisans: Vec<Artisan>,
    products: Vec<Product>,
}

impl Catalog {
    /// Build the seeded launch catalog.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            artisans: seed_artisans(),
            products: seed_products(),
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    #[must_use]
    pub fn artisan(&self, id: ArtisanId) -> Option<&Artisan> {
        self.artisans.iter().find(|artisan| artisan.id == id)
    }

    /// Resolve every id into its artisan record, preserving order.
    /// `None` if any id is missing from the catalog.
    #[must_use]
    pub fn artisans_for(&self, ids: &[ArtisanId]) -> Option<Vec<Artisan>> {
        ids.iter()
            .map(|&id| self.artisan(id).cloned())
            .collect::<Option<Vec<_>>>()
    }

    /// Distinct product categories in catalog order, for the filter bar.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    /// Products shown on the home page.
    #[must_use]
    pub fn featured(&self, count: usize) -> &[Product] {
        self.products.get(..count.min(self.products.len())).unwrap_or(&[])
    }
}

fn price(amount: Decimal) -> Price {
    // Seed amounts are all non-negative literals.
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
            id: ProductId::new(4),
            name: "Rebozo de Telar de Pedales".to_owned(),
            description: "Rebozo tejido en telar de pedales con flecos anudados.".to_owned(),
            category: "textiles".to_owned(),
            price: price(dec!(890)),
            image_url: "https://via.placeholder.com/400x400?text=Rebozo".to_owned(),
            stock: 2,
            artisan_id: ArtisanId::new(2),
        },
        Product {
            id: ProductId::new(5),
            name: "Alebrije Tallado en Copal".to_owned(),
            description: "Figura fantástica tallada en madera de copal y pintada a punto.".to_owned(),
            category: "alebrijes".to_owned(),
            price: price(dec!(750)),
            image_url: "https://via.placeholder.com/400x400?text=Alebrije".to_owned(),
            stock: 4,
            artisan_id: ArtisanId::new(3),
        },
        Product {
            id: ProductId::new(6),
            name: "Nahual Miniatura".to_owned(),
            description: "Miniatura de nahual pintada con pincel de un solo pelo.".to_owned(),
            category: "alebrijes".to_owned(),
            price: price(dec!(280)),
            image_url: "https://via.placeholder.com/400x400?text=Nahual".to_owned(),
            stock: 10,
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
        Product {
            id: ProductId::new(8),
            name: "Sombrero de Palma".to_owned(),
            description: "Sombrero ligero de palma, tejido fino.".to_owned(),
            category: "cestería".to_owned(),
            price: price(dec!(220)),
            image_url: "https://via.placeholder.com/400x400?text=Sombrero".to_owned(),
            stock: 0,
            artisan_id: ArtisanId::new(4),
        },
    ]
}
