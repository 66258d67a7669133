//! Session order history route handler.
//!
//! There are no buyer accounts; the history covers orders placed during
//! the current session.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::session::load_order_history;
use crate::services::orders::Order;
use crate::state::AppState;

/// Order summary display data.
#[derive(Clone)]
pub struct OrderSummaryView {
    pub number: String,
    pub placed_at: String,
    pub total: String,
    pub status_label: String,
    pub item_count: u32,
}

impl From<&Order> for OrderSummaryView {
    fn from(order: &Order) -> Self {
        let item_count = order
            .groups
            .iter()
            .flat_map(|group| group.items.iter())
            .map(|line| line.quantity)
            .sum();
        Self {
            number: order.number.clone(),
            placed_at: order.placed_at.format("%d/%m/%Y %H:%M").to_string(),
            total: format_amount(order.total),
            status_label: order.status.label().to_owned(),
            item_count,
        }
    }
}

/// Format a decimal amount as a price string.
fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2} MXN")
}

/// Session orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderSummaryView>,
}

/// Display the orders placed during this session.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<OrdersIndexTemplate> {
    let numbers = load_order_history(&session).await?;
    let orders = state
        .orders()
        .find_by_numbers(&numbers)
        .await
        .iter()
        .map(OrderSummaryView::from)
        .collect();

    Ok(OrdersIndexTemplate { orders })
}
