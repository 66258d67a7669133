//! Artisan (seller) record.

use serde::{Deserialize, Serialize};

use super::id::ArtisanId;
use super::zone::{PaymentMethod, ShippingZone};

/// A catalog participant who owns products and defines their own shipping
/// zone and payment methods.
///
/// The registered colony/municipality/state triple is the reference point
/// for shipping compatibility: depending on [`ShippingZone`], one of the
/// three must match the buyer's resolved address. The strings are canonical
/// values from the postal-code directory, so plain equality is the right
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artisan {
    pub id: ArtisanId,
    /// Name shown in listings and checkout ("María González").
    pub display_name: String,
    /// Registered colony, e.g. "Centro".
    pub colony: String,
    /// Registered municipality, e.g. "San Bartolo Coyotepec".
    pub municipality: String,
    /// Registered state, e.g. "Oaxaca".
    pub state: String,
    /// Geographic granularity the artisan ships within.
    pub shipping_zone: ShippingZone,
    /// Payment methods the artisan accepts. Never empty for a live artisan.
    pub payment_methods: Vec<PaymentMethod>,
    /// Free-text shipping policy shown at checkout.
    pub shipping_policy: String,
}

impl Artisan {
    /// The "Municipality, State" descriptor shown in listings.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}, {}", self.municipality, self.state)
    }

    /// Whether the artisan accepts the given payment method.
    #[must_use]
    pub fn accepts(&self, method: PaymentMethod) -> bool {
        self.payment_methods.contains(&method)
    }
}
