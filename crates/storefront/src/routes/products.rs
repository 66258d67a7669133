//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use tianguis_core::{Artisan, Product};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Product display data for listing grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub category: String,
    pub artisan_name: String,
    pub in_stock: bool,
}

impl ProductCardView {
    /// Build a card view, resolving the artisan's display name.
    pub fn build(product: &Product, catalog: &crate::catalog::Catalog) -> Self {
        let artisan_name = catalog
            .artisan(product.artisan_id)
            .map_or_else(|| "—".to_owned(), |artisan| artisan.display_name.clone());
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            artisan_name,
            in_stock: product.in_stock(),
        }
    }
}

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub in_stock: bool,
    pub stock: u32,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock(),
            stock: product.stock,
        }
    }
}

/// Artisan display data for the product detail page.
#[derive(Clone)]
pub struct ArtisanCardView {
    pub name: String,
    pub location: String,
    pub zone_label: String,
    pub payment_labels: Vec<&'static str>,
    pub shipping_policy: String,
}

impl From<&Artisan> for ArtisanCardView {
    fn from(artisan: &Artisan) -> Self {
        Self {
            name: artisan.display_name.clone(),
            location: artisan.location(),
            zone_label: artisan.shipping_zone.label().to_owned(),
            payment_labels: artisan
                .payment_methods
                .iter()
                .map(|method| method.label())
                .collect(),
            shipping_policy: artisan.shipping_policy.clone(),
        }
    }
}

/// Catalog filter query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<String>,
    pub current_category: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub artisan: ArtisanCardView,
}

/// Display the product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let products = catalog
        .products()
        .iter()
        .filter(|product| {
            query
                .category
                .as_ref()
                .is_none_or(|category| &product.category == category)
        })
        .map(|product| ProductCardView::build(product, catalog))
        .collect();

    ProductsIndexTemplate {
        products,
        categories: catalog.categories(),
        current_category: query.category,
    }
}

/// Display the product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductShowTemplate> {
    let catalog = state.catalog();
    let product = catalog
        .product(id.into())
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let artisan = catalog
        .artisan(product.artisan_id)
        .ok_or_else(|| AppError::Internal(format!("artisan {} missing", product.artisan_id)))?;

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(product),
        artisan: ArtisanCardView::from(artisan),
    })
}
