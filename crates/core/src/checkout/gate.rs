//! The checkout gate state machine.
//!
//! ```text
//! AddressIncomplete ──submit_postal_code──► VerificationPending
//!        ▲                                        │ apply_lookup
//!        │ lookup failure (retryable)             ▼
//!        └──────────────────────────── Ready | Blocked
//! ```
//!
//! Only `Ready` allows progression to payment-method selection. `Blocked`
//! is terminal-until-user-action, not an error: the buyer edits the address
//! or removes the incompatible artisan's items.
//!
//! Each dispatched lookup carries a monotonically increasing sequence
//! number. A response is applied only while the gate is still pending on
//! that exact sequence number, so re-entrant postal-code edits supersede
//! in-flight lookups (last-write-wins) and a stale response can never
//! clobber a newer one, regardless of arrival order or lookup latency.

use serde::{Deserialize, Serialize};

use super::address::{PostalCode, ResolvedAddress};
use super::compatibility::CompatibilityReport;
use super::error::{CheckoutError, LookupFailure};
use crate::types::{Artisan, ArtisanId};

/// Where the checkout currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum GateState {
    /// No verified address yet. `error` carries the last lookup failure,
    /// if any, so the UI can offer a retry.
    AddressIncomplete { error: Option<LookupFailure> },
    /// A lookup has been dispatched and its response is outstanding.
    VerificationPending { seq: u64, postal_code: PostalCode },
    /// Every artisan in the verified cart can ship to the address.
    Ready {
        address: ResolvedAddress,
        report: CompatibilityReport,
    },
    /// At least one artisan cannot ship to the address.
    Blocked {
        address: ResolvedAddress,
        report: CompatibilityReport,
    },
}

/// A dispatched lookup: the sequence number to apply the response under,
/// and the code to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub seq: u64,
    pub postal_code: PostalCode,
}

/// Outcome of [`CheckoutGate::apply_lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response matched the outstanding lookup and the gate moved.
    Transitioned,
    /// The response was superseded (or the gate was not pending) and was
    /// discarded.
    Stale,
}

/// Session-scoped checkout progression state for one buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutGate {
    state: GateState,
    /// Sequence number of the most recently issued lookup.
    next_seq: u64,
}

impl Default for CheckoutGate {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutGate {
    /// A fresh gate with no address entered.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GateState::AddressIncomplete { error: None },
            next_seq: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GateState {
        &self.state
    }

    /// Validate a postal code and move to `VerificationPending`.
    ///
    /// Always supersedes whatever came before: a previous pending lookup,
    /// a `Ready`, or a `Blocked` — stale compatibility results never
    /// survive an address edit.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidPostalCode`] for malformed input,
    /// in which case the gate does not transition and no lookup may be
    /// dispatched.
    pub fn submit_postal_code(&mut self, raw: &str) -> Result<LookupRequest, CheckoutError> {
        let postal_code = PostalCode::parse(raw)?;
        self.next_seq += 1;
        let request = LookupRequest {
            seq: self.next_seq,
            postal_code: postal_code.clone(),
        };
        self.state = GateState::VerificationPending {
            seq: request.seq,
            postal_code,
        };
        Ok(request)
    }

    /// Apply a lookup response for the request issued as `seq`.
    ///
    /// Responses for superseded sequence numbers are discarded, as are
    /// responses arriving when the gate is no longer pending. On success
    /// the cart's artisans are evaluated into `Ready` or `Blocked`; on
    /// failure the gate returns to `AddressIncomplete` with a retryable
    /// error flag.
    pub fn apply_lookup(
        &mut self,
        seq: u64,
        outcome: Result<ResolvedAddress, LookupFailure>,
        cart_artisans: &[Artisan],
    ) -> Applied {
        match &self.state {
            GateState::VerificationPending { seq: pending, .. } if *pending == seq => {}
            _ => return Applied::Stale,
        }

        self.state = match outcome {
            Ok(address) => {
                let report = CompatibilityReport::evaluate(cart_artisans, &address);
                if report.all_compatible() {
                    GateState::Ready { address, report }
                } else {
                    GateState::Blocked { address, report }
                }
            }
            Err(failure) => GateState::AddressIncomplete {
                error: Some(failure),
            },
        };
        Applied::Transitioned
    }

    /// Whether payment-method selection may proceed for a cart containing
    /// exactly `artisan_ids`.
    ///
    /// A `Ready` computed for a different artisan set (the cart changed
    /// after verification) counts as pending, not as ready.
    #[must_use]
    pub fn is_ready_for(&self, artisan_ids: &[ArtisanId]) -> bool {
        match &self.state {
            GateState::Ready { report, .. } => report.covers(artisan_ids),
            _ => false,
        }
    }

    /// The resolved address, once verification has completed.
    #[must_use]
    pub const fn resolved_address(&self) -> Option<&ResolvedAddress> {
        match &self.state {
            GateState::Ready { address, .. } | GateState::Blocked { address, .. } => Some(address),
            _ => None,
        }
    }

    /// Discard any verification outcome, e.g. after the cart changed
    /// mid-checkout. Sequence numbers keep increasing so an in-flight
    /// lookup from before the reset still cannot apply.
    pub fn reset(&mut self) {
        self.state = GateState::AddressIncomplete { error: None };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, ShippingZone};

    fn artisan(id: i32, name: &str, zone: ShippingZone, colony: &str) -> Artisan {
        Artisan {
            id: ArtisanId::new(id),
            display_name: name.to_owned(),
            colony: colony.to_owned(),
            municipality: "Oaxaca de Juárez".to_owned(),
            state: "Oaxaca".to_owned(),
            shipping_zone: zone,
            payment_methods: vec![PaymentMethod::Cash],
            shipping_policy: String::new(),
        }
    }

    /// Cart with A (StateWide) and B (ColonyOnly, colony "Centro").
    fn two_sellers() -> Vec<Artisan> {
        vec![
            artisan(1, "María González", ShippingZone::StateWide, "Reforma"),
            artisan(2, "Juan Pérez", ShippingZone::ColonyOnly, "Centro"),
        ]
    }

    fn resolved(colony: &str) -> ResolvedAddress {
        ResolvedAddress {
            postal_code: "68000".parse().unwrap(),
            colony: colony.to_owned(),
            municipality: "Oaxaca de Juárez".to_owned(),
            state: "Oaxaca".to_owned(),
        }
    }

    #[test]
    fn test_invalid_postal_code_does_not_transition() {
        let mut gate = CheckoutGate::new();
        let err = gate.submit_postal_code("12A45").unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidPostalCode { .. }));
        assert_eq!(
            gate.state(),
            &GateState::AddressIncomplete { error: None }
        );
    }

    #[test]
    fn test_blocked_enumerates_incompatible_sellers() {
        let mut gate = CheckoutGate::new();
        let request = gate.submit_postal_code("68000").unwrap();
        gate.apply_lookup(request.seq, Ok(resolved("Roma")), &two_sellers());

        let GateState::Blocked { report, .. } = gate.state() else {
            panic!("expected Blocked, got {:?}", gate.state());
        };
        let names: Vec<&str> = report
            .incompatible()
            .map(|e| e.artisan_name.as_str())
            .collect();
        assert_eq!(names, vec!["Juan Pérez"]);
        assert!(!gate.is_ready_for(&[ArtisanId::new(1), ArtisanId::new(2)]));
    }

    #[test]
    fn test_all_compatible_reaches_ready() {
        let mut gate = CheckoutGate::new();
        let request = gate.submit_postal_code("68000").unwrap();
        gate.apply_lookup(request.seq, Ok(resolved("Centro")), &two_sellers());

        assert!(matches!(gate.state(), GateState::Ready { .. }));
        assert!(gate.is_ready_for(&[ArtisanId::new(1), ArtisanId::new(2)]));
    }

    #[test]
    fn test_lookup_failure_is_retryable() {
        let mut gate = CheckoutGate::new();
        let request = gate.submit_postal_code("99999").unwrap();
        gate.apply_lookup(
            request.seq,
            Err(LookupFailure::UnknownPostalCode {
                postal_code: "99999".to_owned(),
            }),
            &two_sellers(),
        );

        let GateState::AddressIncomplete { error } = gate.state() else {
            panic!("expected AddressIncomplete, got {:?}", gate.state());
        };
        assert!(error.is_some());
        // Retry succeeds from here.
        let retry = gate.submit_postal_code("68000").unwrap();
        gate.apply_lookup(retry.seq, Ok(resolved("Centro")), &two_sellers());
        assert!(matches!(gate.state(), GateState::Ready { .. }));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut gate = CheckoutGate::new();
        let first = gate.submit_postal_code("68000").unwrap();
        // Buyer edits the code before the first lookup lands.
        let second = gate.submit_postal_code("71294").unwrap();
        assert!(second.seq > first.seq);

        // The first (now superseded) response arrives late and is dropped.
        assert_eq!(
            gate.apply_lookup(first.seq, Ok(resolved("Roma")), &two_sellers()),
            Applied::Stale
        );
        assert!(matches!(
            gate.state(),
            GateState::VerificationPending { seq, .. } if *seq == second.seq
        ));

        // The second response applies normally.
        assert_eq!(
            gate.apply_lookup(second.seq, Ok(resolved("Centro")), &two_sellers()),
            Applied::Transitioned
        );
        assert!(matches!(gate.state(), GateState::Ready { .. }));
    }

    #[test]
    fn test_editing_postal_code_clears_ready() {
        let mut gate = CheckoutGate::new();
        let request = gate.submit_postal_code("68000").unwrap();
        gate.apply_lookup(request.seq, Ok(resolved("Centro")), &two_sellers());
        assert!(gate.is_ready_for(&[ArtisanId::new(1), ArtisanId::new(2)]));

        // Address edit: back to pending, nothing carried over.
        let request = gate.submit_postal_code("71294").unwrap();
        assert!(matches!(
            gate.state(),
            GateState::VerificationPending { .. }
        ));
        assert!(!gate.is_ready_for(&[ArtisanId::new(1), ArtisanId::new(2)]));
        assert!(gate.resolved_address().is_none());

        // Ready is reachable again only through a fresh verification.
        gate.apply_lookup(request.seq, Ok(resolved("Centro")), &two_sellers());
        assert!(gate.is_ready_for(&[ArtisanId::new(1), ArtisanId::new(2)]));
    }

    #[test]
    fn test_ready_does_not_cover_changed_cart() {
        let mut gate = CheckoutGate::new();
        let request = gate.submit_postal_code("68000").unwrap();
        gate.apply_lookup(request.seq, Ok(resolved("Centro")), &two_sellers());

        // A third artisan's items were added after verification: pending.
        assert!(!gate.is_ready_for(&[
            ArtisanId::new(1),
            ArtisanId::new(2),
            ArtisanId::new(3)
        ]));
        // An artisan's items were removed after verification: also pending.
        assert!(!gate.is_ready_for(&[ArtisanId::new(1)]));
    }

    #[test]
    fn test_reset_discards_outcome_and_inflight_lookup() {
        let mut gate = CheckoutGate::new();
        let request = gate.submit_postal_code("68000").unwrap();
        gate.reset();
        assert_eq!(
            gate.apply_lookup(request.seq, Ok(resolved("Centro")), &two_sellers()),
            Applied::Stale
        );
        assert_eq!(gate.state(), &GateState::AddressIncomplete { error: None });
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut gate = CheckoutGate::new();
        let request = gate.submit_postal_code("68000").unwrap();
        gate.apply_lookup(request.seq, Ok(resolved("Centro")), &two_sellers());

        let json = serde_json::to_string(&gate).unwrap();
        let back: CheckoutGate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gate);
    }
}
