//! Shipping zone levels and payment methods.
//!
//! Both enums come from the artisan registration flow: each artisan picks
//! the geographic granularity they will ship within and the payment methods
//! they accept. The UI renders the Spanish labels; the wire and session
//! representations use the snake_case identifiers.

use serde::{Deserialize, Serialize};

/// Geographic granularity within which an artisan will fulfill orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingZone {
    /// Ships only within the artisan's own colony.
    ColonyOnly,
    /// Ships anywhere in the artisan's municipality.
    MunicipalityWide,
    /// Ships anywhere in the artisan's state.
    StateWide,
}

impl ShippingZone {
    /// Spanish display label, as shown on artisan profiles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ColonyOnly => "Colonia",
            Self::MunicipalityWide => "Municipio",
            Self::StateWide => "Estado",
        }
    }
}

impl std::fmt::Display for ShippingZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColonyOnly => write!(f, "colony_only"),
            Self::MunicipalityWide => write!(f, "municipality_wide"),
            Self::StateWide => write!(f, "state_wide"),
        }
    }
}

impl std::str::FromStr for ShippingZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "colony_only" => Ok(Self::ColonyOnly),
            "municipality_wide" => Ok(Self::MunicipalityWide),
            "state_wide" => Ok(Self::StateWide),
            _ => Err(format!("invalid shipping zone: {s}")),
        }
    }
}

/// A payment method an artisan accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash, coordinated directly with the artisan on delivery.
    Cash,
    /// Card.
    Card,
}

impl PaymentMethod {
    /// Spanish display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Efectivo",
            Self::Card => "Tarjeta",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_display_fromstr_roundtrip() {
        for zone in [
            ShippingZone::ColonyOnly,
            ShippingZone::MunicipalityWide,
            ShippingZone::StateWide,
        ] {
            let parsed: ShippingZone = zone.to_string().parse().unwrap();
            assert_eq!(parsed, zone);
        }
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::Cash.label(), "Efectivo");
        assert_eq!(PaymentMethod::Card.label(), "Tarjeta");
    }

    #[test]
    fn test_payment_method_fromstr_rejects_unknown() {
        assert!("transferencia".parse::<PaymentMethod>().is_err());
    }
}
