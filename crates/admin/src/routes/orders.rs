//! Artisan order management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use tianguis_core::OrderStatus;

use crate::data::SellerOrder;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::dashboard::ArtisanView;
use crate::state::AppState;

/// Order row for the artisan's table, with the allowed next statuses.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: i32,
    pub number: String,
    pub buyer_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub total: String,
    pub placed_at: String,
    pub status_label: String,
    /// (form value, label) pairs for the status select.
    pub next_statuses: Vec<(String, &'static str)>,
}

impl From<&SellerOrder> for OrderRowView {
    fn from(order: &SellerOrder) -> Self {
        let next_statuses = [
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
        .into_iter()
        .filter(|&next| order.status.can_transition_to(next))
        .map(|next| (next.to_string(), next.label()))
        .collect();

        Self {
            id: order.id.as_i32(),
            number: order.number.clone(),
            buyer_name: order.buyer_name.clone(),
            product_name: order.product_name.clone(),
            quantity: order.quantity,
            total: format!("${:.2} MXN", order.total),
            placed_at: order.placed_at.format("%d/%m/%Y").to_string(),
            status_label: order.status.label().to_owned(),
            next_statuses,
        }
    }
}

/// Artisan orders template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub artisan: ArtisanView,
    pub orders: Vec<OrderRowView>,
    pub revenue: String,
}

/// Order table handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Path(id): Path<i32>) -> Result<OrdersTemplate> {
    let artisan = state
        .data()
        .artisan(id.into())
        .await
        .ok_or_else(|| AppError::NotFound(format!("artisan {id}")))?;

    let mut orders = state.data().orders_for(artisan.id).await;
    orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));

    let revenue: Decimal = orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .map(|order| order.total)
        .sum();

    Ok(OrdersTemplate {
        artisan: ArtisanView {
            id: artisan.id.as_i32(),
            name: artisan.display_name.clone(),
            location: artisan.location(),
        },
        orders: orders.iter().map(OrderRowView::from).collect(),
        revenue: format!("${revenue:.2} MXN"),
    })
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Advance an order's status and return to the order table.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path((id, order_id)): Path<(i32, i32)>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let next: OrderStatus = form
        .status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid status {}", form.status)))?;

    state
        .data()
        .advance_order(id.into(), order_id.into(), next)
        .await?;

    tracing::info!(artisan = id, order = order_id, status = %next, "order status updated");
    Ok(Redirect::to(&format!("/artisans/{id}/orders")))
}
