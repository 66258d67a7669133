//! Checkout error taxonomy.
//!
//! None of these are fatal: every variant is recovered at the HTTP boundary
//! and rendered as an actionable message. The worst outcome is "cannot
//! proceed to submission".

use serde::{Deserialize, Serialize};

use crate::types::PaymentMethod;

/// Why a postal-code lookup did not produce a resolved address.
///
/// Retryable: the UI offers the buyer a retry, and the gate returns to the
/// address-entry state. Serializable because the gate carries the last
/// failure across requests in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LookupFailure {
    /// The code is well-formed but not present in the directory.
    #[error("postal code {postal_code} is not in the directory")]
    UnknownPostalCode { postal_code: String },
    /// The resolution service did not answer.
    #[error("postal code service unavailable")]
    ServiceUnavailable,
}

/// Errors raised by the checkout rules engine.
///
/// `LookupFailed` and a blocked gate must never be conflated in user-facing
/// text: one means "we could not verify", the other "we verified and an
/// artisan cannot ship to you".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// Format-level rejection, detected before any lookup is dispatched.
    #[error("postal code must be exactly 5 digits, got {input:?}")]
    InvalidPostalCode { input: String },

    /// The external lookup collaborator failed; retryable.
    #[error("postal code lookup failed: {0}")]
    LookupFailed(#[from] LookupFailure),

    /// Submission was attempted without a Ready gate for the current cart.
    #[error("shipping compatibility has not been verified for this cart")]
    NotReady,

    /// An artisan group is missing its required payment-method selection.
    #[error("no payment method selected for {artisan}")]
    IncompleteSelection { artisan: String },

    /// The selected method is not in the artisan's accepted set.
    #[error("{artisan} does not accept payment by {method}")]
    UnsupportedPaymentMethod {
        artisan: String,
        method: PaymentMethod,
    },
}
