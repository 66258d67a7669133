//! Artisan dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use rust_decimal::Decimal;
use tracing::instrument;

use tianguis_core::OrderStatus;

use crate::data::SellerOrder;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Artisan identity shown in the page header and nav links.
#[derive(Debug, Clone)]
pub struct ArtisanView {
    pub id: i32,
    pub name: String,
    pub location: String,
}

/// Dashboard metric tiles.
#[derive(Debug, Clone)]
pub struct DashboardMetrics {
    pub orders: String,
    pub pending: String,
    pub revenue: String,
    pub products: String,
}

/// Recent order row for the dashboard.
#[derive(Debug, Clone)]
pub struct RecentOrderView {
    pub number: String,
    pub buyer_name: String,
    pub total: String,
    pub status_label: String,
}

impl From<&SellerOrder> for RecentOrderView {
    fn from(order: &SellerOrder) -> Self {
        Self {
            number: order.number.clone(),
            buyer_name: order.buyer_name.clone(),
            total: format_amount(order.total),
            status_label: order.status.label().to_owned(),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub artisan: ArtisanView,
    pub metrics: DashboardMetrics,
    pub recent_orders: Vec<RecentOrderView>,
}

/// Format a decimal amount as a price string.
fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2} MXN")
}

/// Dashboard page handler.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<DashboardTemplate> {
    let artisan = state
        .data()
        .artisan(id.into())
        .await
        .ok_or_else(|| AppError::NotFound(format!("artisan {id}")))?;

    let mut orders = state.data().orders_for(artisan.id).await;
    orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));

    // Cancelled orders do not count toward revenue.
    let revenue: Decimal = orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .map(|order| order.total)
        .sum();
    let pending = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Pending)
        .count();
    let product_count = state.data().product_count(artisan.id).await;

    let metrics = DashboardMetrics {
        orders: orders.len().to_string(),
        pending: pending.to_string(),
        revenue: format_amount(revenue),
        products: product_count.to_string(),
    };

    let recent_orders = orders.iter().take(5).map(RecentOrderView::from).collect();

    Ok(DashboardTemplate {
        artisan: ArtisanView {
            id: artisan.id.as_i32(),
            name: artisan.display_name.clone(),
            location: artisan.location(),
        },
        metrics,
        recent_orders,
    })
}
