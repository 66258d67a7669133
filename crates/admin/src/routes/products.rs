//! Artisan product table route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use tianguis_core::Product;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::dashboard::ArtisanView;
use crate::state::AppState;

/// Product row for the artisan's table.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: u32,
    pub in_stock: bool,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            stock: product.stock,
            in_stock: product.in_stock(),
        }
    }
}

/// Artisan products template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub artisan: ArtisanView,
    pub products: Vec<ProductRowView>,
}

/// Product table handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductsTemplate> {
    let artisan = state
        .data()
        .artisan(id.into())
        .await
        .ok_or_else(|| AppError::NotFound(format!("artisan {id}")))?;

    let products = state
        .data()
        .products_for(artisan.id)
        .await
        .iter()
        .map(ProductRowView::from)
        .collect();

    Ok(ProductsTemplate {
        artisan: ArtisanView {
            id: artisan.id.as_i32(),
            name: artisan.display_name.clone(),
            location: artisan.location(),
        },
        products,
    })
}
