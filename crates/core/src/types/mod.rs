//! Core types for Tianguis.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod artisan;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod zone;

pub use artisan::Artisan;
pub use email::{Email, EmailError};
pub use id::*;
pub use order::OrderStatus;
pub use price::{Price, PriceError};
pub use product::Product;
pub use zone::{PaymentMethod, ShippingZone};
