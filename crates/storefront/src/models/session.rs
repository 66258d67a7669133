//! Session-stored state.
//!
//! The cart and the checkout gate are the session-scoped state of one
//! buyer's visit (there is no account system). Both are plain serializable
//! values: every handler loads them, applies a pure operation from
//! `tianguis_core`, and stores them back.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use tianguis_core::{BuyerContact, Cart, CheckoutGate};

use crate::error::Result;

/// Session keys for buyer state.
pub mod keys {
    /// Key for the buyer's cart.
    pub const CART: &str = "cart";

    /// Key for the checkout gate state machine.
    pub const CHECKOUT_GATE: &str = "checkout_gate";

    /// Key for the buyer's shipping contact details.
    pub const SHIPPING_DETAILS: &str = "shipping_details";

    /// Key for order numbers placed during this session.
    pub const ORDER_HISTORY: &str = "order_history";
}

/// Contact details and street address collected in the shipping step.
///
/// The colony/municipality/state of the address are *not* stored here:
/// they come from the postal-code lookup and live in the gate's resolved
/// address, so they can never disagree with what was verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub contact: BuyerContact,
    pub street: String,
}

/// Load the cart, defaulting to empty for a fresh session.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the cart.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Load the checkout gate, defaulting to a fresh gate.
pub async fn load_gate(session: &Session) -> Result<CheckoutGate> {
    Ok(session
        .get::<CheckoutGate>(keys::CHECKOUT_GATE)
        .await?
        .unwrap_or_default())
}

/// Store the checkout gate.
pub async fn save_gate(session: &Session, gate: &CheckoutGate) -> Result<()> {
    session.insert(keys::CHECKOUT_GATE, gate).await?;
    Ok(())
}

/// Load the shipping details, if the buyer has filled them in.
pub async fn load_shipping_details(session: &Session) -> Result<Option<ShippingDetails>> {
    Ok(session
        .get::<ShippingDetails>(keys::SHIPPING_DETAILS)
        .await?)
}

/// Store the shipping details.
pub async fn save_shipping_details(session: &Session, details: &ShippingDetails) -> Result<()> {
    session.insert(keys::SHIPPING_DETAILS, details).await?;
    Ok(())
}

/// Order numbers placed during this session, newest last.
pub async fn load_order_history(session: &Session) -> Result<Vec<String>> {
    Ok(session
        .get::<Vec<String>>(keys::ORDER_HISTORY)
        .await?
        .unwrap_or_default())
}

/// Append an order number to the session history.
pub async fn push_order_number(session: &Session, number: &str) -> Result<()> {
    let mut history = load_order_history(session).await?;
    history.push(number.to_owned());
    session.insert(keys::ORDER_HISTORY, &history).await?;
    Ok(())
}
