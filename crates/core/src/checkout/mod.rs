//! The multi-artisan checkout rules engine.
//!
//! A buyer's cart can mix products from several artisans, and each artisan
//! independently decides how far they ship and how they get paid. Checkout
//! therefore has to:
//!
//! 1. split the cart into per-artisan groups ([`cart::group_by_artisan`]),
//! 2. check every artisan against the buyer's resolved address
//!    ([`compatibility`]),
//! 3. gate progression to payment on all artisans being compatible
//!    ([`gate::CheckoutGate`]), and
//! 4. require one accepted payment method per artisan before submission
//!    ([`payment::validate_selections`]).
//!
//! Everything here is pure and serializable. The storefront owns the async
//! postal-code lookup and drives the gate from request handlers; the gate's
//! sequence numbers make a superseded lookup response a no-op no matter when
//! it arrives.

pub mod address;
pub mod cart;
pub mod compatibility;
pub mod error;
pub mod gate;
pub mod payment;

pub use address::{BuyerContact, PostalCode, ResolvedAddress};
pub use cart::{ArtisanGroup, Cart, LineItem, group_by_artisan};
pub use compatibility::{CompatibilityEntry, CompatibilityReport, can_ship};
pub use error::{CheckoutError, LookupFailure};
pub use gate::{Applied, CheckoutGate, GateState, LookupRequest};
pub use payment::validate_selections;
