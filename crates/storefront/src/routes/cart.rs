//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session; every view is rebuilt from it and
//! the catalog on each request, so totals can never drift from the lines.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tianguis_core::{Cart, LineItem, group_by_artisan};

use crate::error::Result;
use crate::filters;
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image_url: String,
}

/// One artisan's block of the cart page.
#[derive(Clone)]
pub struct CartGroupView {
    pub artisan_name: String,
    pub artisan_location: String,
    pub subtotal: String,
    pub items: Vec<CartItemView>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub groups: Vec<CartGroupView>,
    pub total: String,
    pub item_count: u32,
    pub empty: bool,
}

/// Format a decimal amount as a price string.
fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2} MXN")
}

/// Build the grouped cart view from the session cart and the catalog.
/// Also used by the checkout page's order-summary column.
pub fn build_cart_view(state: &AppState, cart: &Cart) -> CartView {
    let catalog = state.catalog();
    let groups = group_by_artisan(cart)
        .into_iter()
        .map(|group| {
            let (artisan_name, artisan_location) = catalog.artisan(group.artisan_id).map_or_else(
                || ("—".to_owned(), String::new()),
                |artisan| (artisan.display_name.clone(), artisan.location()),
            );
            CartGroupView {
                artisan_name,
                artisan_location,
                subtotal: format_amount(group.subtotal),
                items: group
                    .items
                    .iter()
                    .map(|line| CartItemView {
                        product_id: line.product_id.as_i32(),
                        name: line.name.clone(),
                        quantity: line.quantity,
                        unit_price: line.unit_price.to_string(),
                        line_price: format_amount(line.extended()),
                        image_url: catalog
                            .product(line.product_id)
                            .map_or_else(String::new, |product| product.image_url.clone()),
                    })
                    .collect(),
            }
        })
        .collect();

    CartView {
        groups,
        total: format_amount(cart.total()),
        item_count: cart.item_count(),
        empty: cart.is_empty(),
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;
    Ok(CartShowTemplate {
        cart: build_cart_view(&state, &cart),
    })
}

/// Add item to cart (HTMX).
///
/// Returns the cart count badge with an HTMX trigger so other fragments
/// can refresh themselves.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let Some(product) = state.catalog().product(form.product_id.into()) else {
        return Ok((
            StatusCode::NOT_FOUND,
            Html("<span class=\"form-error\">Producto no encontrado</span>"),
        )
            .into_response());
    };
    if !product.in_stock() {
        return Ok((
            StatusCode::CONFLICT,
            Html("<span class=\"form-error\">Producto agotado</span>"),
        )
            .into_response());
    }

    let mut cart = load_cart(&session).await?;
    cart.add(LineItem {
        product_id: product.id,
        name: product.name.clone(),
        unit_price: product.price,
        quantity: form.quantity.unwrap_or(1),
        artisan_id: product.artisan_id,
    });
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(form.product_id.into(), form.quantity);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: build_cart_view(&state, &cart),
        },
    )
        .into_response())
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    cart.remove(form.product_id.into());
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: build_cart_view(&state, &cart),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}
