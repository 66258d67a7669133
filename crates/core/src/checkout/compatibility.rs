//! Shipping compatibility between artisans and a resolved buyer address.

use serde::{Deserialize, Serialize};

use super::address::ResolvedAddress;
use crate::types::{Artisan, ArtisanId, ShippingZone};

/// Whether an artisan can fulfill shipment to the buyer's location.
///
/// The comparison level follows the artisan's declared zone; narrower
/// components of the address are irrelevant once the declared level
/// matches. Both sides of the comparison use the postal-code directory's
/// canonical strings.
#[must_use]
pub fn can_ship(artisan: &Artisan, address: &ResolvedAddress) -> bool {
    match artisan.shipping_zone {
        ShippingZone::ColonyOnly => artisan.colony == address.colony,
        ShippingZone::MunicipalityWide => artisan.municipality == address.municipality,
        ShippingZone::StateWide => artisan.state == address.state,
    }
}

/// Per-artisan compatibility verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub artisan_id: ArtisanId,
    /// Display name, so the blocked state can enumerate artisans by name.
    pub artisan_name: String,
    pub compatible: bool,
}

/// Compatibility verdicts for every artisan in the cart, in group order.
///
/// A report only ever exists for a *resolved* address. "Unknown"
/// compatibility is represented by the gate still being in its pending
/// state, never by a defaulted boolean in here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    entries: Vec<CompatibilityEntry>,
}

impl CompatibilityReport {
    /// Evaluate every artisan against the resolved address.
    #[must_use]
    pub fn evaluate(artisans: &[Artisan], address: &ResolvedAddress) -> Self {
        Self {
            entries: artisans
                .iter()
                .map(|artisan| CompatibilityEntry {
                    artisan_id: artisan.id,
                    artisan_name: artisan.display_name.clone(),
                    compatible: can_ship(artisan, address),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CompatibilityEntry] {
        &self.entries
    }

    /// True when every entry is compatible. Vacuously true for an empty
    /// report; callers gate empty carts out before verification.
    #[must_use]
    pub fn all_compatible(&self) -> bool {
        self.entries.iter().all(|entry| entry.compatible)
    }

    /// The incompatible artisans, for the blocked-state diagnostic list.
    pub fn incompatible(&self) -> impl Iterator<Item = &CompatibilityEntry> {
        self.entries.iter().filter(|entry| !entry.compatible)
    }

    /// Whether this report covers exactly the given artisan set.
    ///
    /// A report computed for a different cart composition (items added or
    /// removed since verification) must be treated as verification
    /// pending, not as implicitly compatible.
    #[must_use]
    pub fn covers(&self, artisan_ids: &[ArtisanId]) -> bool {
        let mut reported: Vec<ArtisanId> = self.entries.iter().map(|e| e.artisan_id).collect();
        let mut expected: Vec<ArtisanId> = artisan_ids.to_vec();
        reported.sort_unstable();
        reported.dedup();
        expected.sort_unstable();
        expected.dedup();
        reported == expected
    }
}
