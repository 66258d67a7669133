//! Tianguis Admin library.
//!
//! Artisan self-service dashboard (products, orders, profile) plus a thin
//! platform overview. There is no authentication: the acting artisan is
//! selected by path parameter.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod data;
pub mod error;
pub mod filters;
pub mod routes;
pub mod state;
