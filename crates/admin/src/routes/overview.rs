//! Platform overview route handler.
//!
//! A thin read-only page for marketplace operators: totals per artisan and
//! the most recent orders across the platform.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use rust_decimal::Decimal;
use tracing::instrument;

use tianguis_core::OrderStatus;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Platform totals.
#[derive(Debug, Clone)]
pub struct PlatformMetrics {
    pub artisans: String,
    pub orders: String,
    pub revenue: String,
}

/// Per-artisan overview row.
#[derive(Debug, Clone)]
pub struct ArtisanRowView {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub zone_label: String,
    pub products: usize,
    pub orders: usize,
    pub revenue: String,
}

/// Recent order row across the whole platform.
#[derive(Debug, Clone)]
pub struct PlatformOrderView {
    pub number: String,
    pub buyer_name: String,
    pub total: String,
    pub status_label: String,
}

/// Overview template.
#[derive(Template, WebTemplate)]
#[template(path = "overview.html")]
pub struct OverviewTemplate {
    pub metrics: PlatformMetrics,
    pub artisans: Vec<ArtisanRowView>,
    pub recent_orders: Vec<PlatformOrderView>,
}

/// Format a decimal amount as a price string.
fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2} MXN")
}

/// Overview page handler.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<OverviewTemplate> {
    let artisans = state.data().artisans().await;
    let mut all_orders = state.data().all_orders().await;
    all_orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));

    let mut rows = Vec::with_capacity(artisans.len());
    for artisan in &artisans {
        let orders: Vec<_> = all_orders
            .iter()
            .filter(|order| order.artisan_id == artisan.id)
            .collect();
        let revenue: Decimal = orders
            .iter()
            .filter(|order| order.status != OrderStatus::Cancelled)
            .map(|order| order.total)
            .sum();
        rows.push(ArtisanRowView {
            id: artisan.id.as_i32(),
            name: artisan.display_name.clone(),
            location: artisan.location(),
            zone_label: artisan.shipping_zone.label().to_owned(),
            products: state.data().product_count(artisan.id).await,
            orders: orders.len(),
            revenue: format_amount(revenue),
        });
    }

    let total_revenue: Decimal = all_orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .map(|order| order.total)
        .sum();

    let recent_orders = all_orders
        .iter()
        .take(8)
        .map(|order| PlatformOrderView {
            number: order.number.clone(),
            buyer_name: order.buyer_name.clone(),
            total: format_amount(order.total),
            status_label: order.status.label().to_owned(),
        })
        .collect();

    Ok(OverviewTemplate {
        metrics: PlatformMetrics {
            artisans: artisans.len().to_string(),
            orders: all_orders.len().to_string(),
            revenue: format_amount(total_revenue),
        },
        artisans: rows,
        recent_orders,
    })
}
