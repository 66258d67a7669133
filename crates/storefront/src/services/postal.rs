//! Postal-code resolution collaborator.
//!
//! In production this would call a geocoding provider (Copomex or similar);
//! here it is a seeded directory behind the same seam. Resolved codes are
//! cached: postal-code geography is immutable reference data.
//!
//! The simulated latency exists so the checkout flow can be exercised with
//! slow lookups. Correctness never depends on it: the gate's sequence
//! numbers decide which response applies, not arrival order.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::instrument;

use tianguis_core::{LookupFailure, PostalCode, ResolvedAddress};

/// The postal-code resolution seam.
#[async_trait]
pub trait PostalResolver: Send + Sync {
    /// Resolve a postal code into colony/municipality/state.
    ///
    /// # Errors
    ///
    /// Returns [`LookupFailure`] when the code is unknown or the service
    /// is unavailable; both are retryable from the buyer's point of view.
    async fn resolve(&self, postal_code: &PostalCode) -> Result<ResolvedAddress, LookupFailure>;
}

/// Postal code that simulates a directory outage, for exercising the
/// retryable-failure path without a real external dependency.
pub const OUTAGE_POSTAL_CODE: &str = "00000";

/// Seeded directory entries: (code, colony, municipality, state).
const DIRECTORY: &[(&str, &str, &str, &str)] = &[
    ("68000", "Centro", "Oaxaca de Juárez", "Oaxaca"),
    ("68050", "Reforma", "Oaxaca de Juárez", "Oaxaca"),
    ("71294", "Centro", "San Bartolo Coyotepec", "Oaxaca"),
    ("70420", "Centro", "Teotitlán del Valle", "Oaxaca"),
    ("71506", "Centro", "San Martín Tilcajete", "Oaxaca"),
    ("72000", "Centro", "Puebla", "Puebla"),
];

/// In-process postal directory with simulated latency and a lookup cache.
pub struct DirectoryResolver {
    latency: Duration,
    cache: Cache<String, ResolvedAddress>,
}

impl DirectoryResolver {
    /// Create a resolver with the given simulated lookup latency.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            cache: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(24 * 60 * 60))
                .build(),
        }
    }

    fn directory_lookup(postal_code: &PostalCode) -> Option<ResolvedAddress> {
        DIRECTORY
            .iter()
            .find(|(code, ..)| *code == postal_code.as_str())
            .map(|(_, colony, municipality, state)| ResolvedAddress {
                postal_code: postal_code.clone(),
                colony: (*colony).to_owned(),
                municipality: (*municipality).to_owned(),
                state: (*state).to_owned(),
            })
    }
}

#[async_trait]
impl PostalResolver for DirectoryResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, postal_code: &PostalCode) -> Result<ResolvedAddress, LookupFailure> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if postal_code.as_str() == OUTAGE_POSTAL_CODE {
            tracing::warn!("simulated postal directory outage");
            return Err(LookupFailure::ServiceUnavailable);
        }

        if let Some(hit) = self.cache.get(postal_code.as_str()).await {
            return Ok(hit);
        }

        match Self::directory_lookup(postal_code) {
            Some(address) => {
                self.cache
                    .insert(postal_code.as_str().to_owned(), address.clone())
                    .await;
                Ok(address)
            }
            None => {
                tracing::debug!(code = %postal_code, "postal code not in directory");
                Err(LookupFailure::UnknownPostalCode {
                    postal_code: postal_code.as_str().to_owned(),
                })
            }
        }
    }
}
