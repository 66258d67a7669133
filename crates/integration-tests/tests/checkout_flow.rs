//! Checkout-flow tests driving the gate together with the real postal
//! resolver and the seeded catalog, outside HTTP.
//!
//! These cover the async properties the core's unit tests state only
//! abstractly: lookups resolving through the directory, superseded lookups
//! being discarded regardless of latency, and failure recovery.

use std::time::Duration;

use tianguis_core::{Applied, ArtisanId, CheckoutGate, GateState, LookupFailure};
use tianguis_storefront::catalog::Catalog;
use tianguis_storefront::services::postal::{DirectoryResolver, PostalResolver};

/// Artisans 1 (MunicipalityWide, San Bartolo Coyotepec) and 3 (ColonyOnly,
/// colony "Centro") from the seeded catalog.
fn cart_artisans(catalog: &Catalog) -> Vec<tianguis_core::Artisan> {
    catalog
        .artisans_for(&[ArtisanId::new(1), ArtisanId::new(3)])
        .expect("seeded artisans")
}

#[tokio::test]
async fn lookup_resolves_and_gate_reaches_ready() {
    let catalog = Catalog::seed();
    let resolver = DirectoryResolver::new(Duration::ZERO);
    let artisans = cart_artisans(&catalog);
    let ids: Vec<ArtisanId> = artisans.iter().map(|artisan| artisan.id).collect();

    let mut gate = CheckoutGate::new();
    // 71294 resolves to (Centro, San Bartolo Coyotepec, Oaxaca): artisan 1
    // matches by municipality, artisan 3 by colony name.
    let request = gate.submit_postal_code("71294").expect("valid code");
    let outcome = resolver.resolve(&request.postal_code).await;
    assert_eq!(
        gate.apply_lookup(request.seq, outcome, &artisans),
        Applied::Transitioned
    );

    assert!(gate.is_ready_for(&ids));
}

#[tokio::test]
async fn lookup_blocks_and_names_the_incompatible_artisan() {
    let catalog = Catalog::seed();
    let resolver = DirectoryResolver::new(Duration::ZERO);
    let artisans = cart_artisans(&catalog);

    let mut gate = CheckoutGate::new();
    // 68050 resolves to (Reforma, Oaxaca de Juárez, Oaxaca): wrong
    // municipality for artisan 1 and wrong colony for artisan 3.
    let request = gate.submit_postal_code("68050").expect("valid code");
    let outcome = resolver.resolve(&request.postal_code).await;
    gate.apply_lookup(request.seq, outcome, &artisans);

    let GateState::Blocked { report, .. } = gate.state() else {
        panic!("expected Blocked, got {:?}", gate.state());
    };
    let blocked: Vec<&str> = report
        .incompatible()
        .map(|entry| entry.artisan_name.as_str())
        .collect();
    assert_eq!(blocked, vec!["María González", "Lucía Ramírez"]);
}

#[tokio::test]
async fn superseded_lookup_never_applies_even_with_latency() {
    let catalog = Catalog::seed();
    let resolver = DirectoryResolver::new(Duration::from_millis(25));
    let artisans = cart_artisans(&catalog);
    let ids: Vec<ArtisanId> = artisans.iter().map(|artisan| artisan.id).collect();

    let mut gate = CheckoutGate::new();

    // First lookup dispatched, then the buyer edits the code before the
    // response lands.
    let first = gate.submit_postal_code("68050").expect("valid code");
    let second = gate.submit_postal_code("71294").expect("valid code");

    let first_outcome = resolver.resolve(&first.postal_code).await;
    let second_outcome = resolver.resolve(&second.postal_code).await;

    // Responses arrive out of order: the newer one first.
    assert_eq!(
        gate.apply_lookup(second.seq, second_outcome, &artisans),
        Applied::Transitioned
    );
    assert!(gate.is_ready_for(&ids));

    // The stale response must not overwrite the newer verification, no
    // matter when it finally shows up.
    assert_eq!(
        gate.apply_lookup(first.seq, first_outcome, &artisans),
        Applied::Stale
    );
    assert!(gate.is_ready_for(&ids));
}

#[tokio::test]
async fn lookup_failure_is_retryable_and_preserves_nothing_stale() {
    let catalog = Catalog::seed();
    let resolver = DirectoryResolver::new(Duration::ZERO);
    let artisans = cart_artisans(&catalog);
    let ids: Vec<ArtisanId> = artisans.iter().map(|artisan| artisan.id).collect();

    let mut gate = CheckoutGate::new();

    // Unknown code: back to address entry with a retryable error.
    let request = gate.submit_postal_code("99999").expect("well-formed code");
    let outcome = resolver.resolve(&request.postal_code).await;
    gate.apply_lookup(request.seq, outcome, &artisans);
    assert!(matches!(
        gate.state(),
        GateState::AddressIncomplete {
            error: Some(LookupFailure::UnknownPostalCode { .. })
        }
    ));

    // Simulated outage: also retryable, distinct failure.
    let request = gate.submit_postal_code("00000").expect("well-formed code");
    let outcome = resolver.resolve(&request.postal_code).await;
    gate.apply_lookup(request.seq, outcome, &artisans);
    assert!(matches!(
        gate.state(),
        GateState::AddressIncomplete {
            error: Some(LookupFailure::ServiceUnavailable)
        }
    ));

    // Retry with a good code succeeds from the failed state.
    let request = gate.submit_postal_code("71294").expect("valid code");
    let outcome = resolver.resolve(&request.postal_code).await;
    gate.apply_lookup(request.seq, outcome, &artisans);
    assert!(gate.is_ready_for(&ids));
}
