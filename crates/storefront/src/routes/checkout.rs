//! Checkout route handlers.
//!
//! The flow has two steps. Step 1 collects contact details and the postal
//! code; entering a valid code dispatches a lookup and renders the
//! shipping-compatibility panel. Step 2 (payment methods per artisan) is
//! reachable only while the gate is `Ready` for the cart's current artisan
//! set, and submission re-checks everything through the order service.
//!
//! Requests for one session are serialized by the UI event loop; the
//! gate's sequence numbers additionally make any superseded lookup
//! response a no-op, so a slow lookup can never overwrite the outcome of a
//! newer postal-code edit.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tianguis_core::{
    Artisan, ArtisanId, BuyerContact, Cart, CheckoutError, CheckoutGate, Email, GateState,
    LookupFailure, PaymentMethod, group_by_artisan,
};

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::ShippingDetails;
use crate::models::session::{
    load_cart, load_gate, load_shipping_details, push_order_number, save_cart, save_gate,
    save_shipping_details,
};
use crate::routes::cart::{CartItemView, CartView, build_cart_view};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Per-artisan verdict row in the shipping-compatibility panel.
#[derive(Clone)]
pub struct CompatEntryView {
    pub name: String,
    pub compatible: bool,
}

/// Resolved-address display data.
#[derive(Clone)]
pub struct AddressView {
    pub colony: String,
    pub municipality: String,
    pub state: String,
}

/// Shipping-compatibility panel state.
///
/// Exactly one of the flags is set, except the idle state where none are.
/// A lookup failure and a blocked verdict are rendered as different things
/// on purpose: one offers a retry, the other remediation.
#[derive(Clone, Default)]
pub struct ShippingCheckView {
    pub pending: bool,
    pub ready: bool,
    pub blocked: bool,
    pub entries: Vec<CompatEntryView>,
    pub address: Option<AddressView>,
    /// Retryable lookup failure ("verification pending" cause).
    pub lookup_error: Option<String>,
    /// Format-level rejection of the entered postal code.
    pub format_error: Option<String>,
}

impl ShippingCheckView {
    /// Render the gate state for a cart containing `artisan_ids`.
    ///
    /// A `Ready`/`Blocked` report that no longer covers the cart is shown
    /// as pending: partial or stale verification must never read as
    /// compatible.
    fn from_gate(gate: &CheckoutGate, artisan_ids: &[ArtisanId]) -> Self {
        match gate.state() {
            GateState::AddressIncomplete { error: None } => Self::default(),
            GateState::AddressIncomplete { error: Some(failure) } => Self {
                lookup_error: Some(lookup_failure_message(failure)),
                ..Self::default()
            },
            GateState::VerificationPending { .. } => Self {
                pending: true,
                ..Self::default()
            },
            GateState::Ready { address, report } | GateState::Blocked { address, report } => {
                if report.covers(artisan_ids) {
                    let ready = matches!(gate.state(), GateState::Ready { .. });
                    Self {
                        ready,
                        blocked: !ready,
                        entries: report
                            .entries()
                            .iter()
                            .map(|entry| CompatEntryView {
                                name: entry.artisan_name.clone(),
                                compatible: entry.compatible,
                            })
                            .collect(),
                        address: Some(AddressView {
                            colony: address.colony.clone(),
                            municipality: address.municipality.clone(),
                            state: address.state.clone(),
                        }),
                        ..Self::default()
                    }
                } else {
                    Self {
                        pending: true,
                        ..Self::default()
                    }
                }
            }
        }
    }
}

/// User-facing text for a lookup failure, kept distinct from the
/// incompatible-artisan messaging.
fn lookup_failure_message(failure: &LookupFailure) -> String {
    match failure {
        LookupFailure::UnknownPostalCode { postal_code } => {
            format!("No encontramos el código postal {postal_code}. Revísalo e inténtalo de nuevo.")
        }
        LookupFailure::ServiceUnavailable => {
            "No pudimos consultar tu código postal. Inténtalo de nuevo en un momento.".to_owned()
        }
    }
}

/// One artisan's block in the payment step.
#[derive(Clone)]
pub struct PaymentGroupView {
    pub artisan_id: i32,
    pub artisan_name: String,
    pub artisan_location: String,
    pub shipping_policy: String,
    pub subtotal: String,
    pub accepts_cash: bool,
    pub accepts_card: bool,
    pub items: Vec<CartItemView>,
}

/// Prefilled shipping form values.
#[derive(Clone, Default)]
pub struct ShippingFormView {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub postal_code: String,
}

/// Checkout page template (step 1: shipping).
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub cart: CartView,
    pub form: ShippingFormView,
    pub check: ShippingCheckView,
    pub form_error: Option<String>,
}

/// Shipping-compatibility panel fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/shipping_check.html")]
pub struct ShippingCheckTemplate {
    pub check: ShippingCheckView,
}

/// Payment step template (step 2).
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub groups: Vec<PaymentGroupView>,
    pub total: String,
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub number: String,
    pub email: String,
}

/// Format a decimal amount as a price string.
fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2} MXN")
}

// =============================================================================
// Helpers
// =============================================================================

/// Resolve the artisan records for every artisan in the cart.
fn cart_artisans(state: &AppState, cart: &Cart) -> Result<Vec<Artisan>> {
    state
        .catalog()
        .artisans_for(&cart.artisan_ids())
        .ok_or_else(|| AppError::Internal("cart references an artisan missing from the catalog".to_owned()))
}

fn build_payment_groups(state: &AppState, cart: &Cart) -> Result<Vec<PaymentGroupView>> {
    let catalog = state.catalog();
    group_by_artisan(cart)
        .into_iter()
        .map(|group| {
            let artisan = catalog.artisan(group.artisan_id).ok_or_else(|| {
                AppError::Internal(format!("artisan {} missing", group.artisan_id))
            })?;
            Ok(PaymentGroupView {
                artisan_id: artisan.id.as_i32(),
                artisan_name: artisan.display_name.clone(),
                artisan_location: artisan.location(),
                shipping_policy: artisan.shipping_policy.clone(),
                subtotal: format_amount(group.subtotal),
                accepts_cash: artisan.accepts(PaymentMethod::Cash),
                accepts_card: artisan.accepts(PaymentMethod::Card),
                items: group
                    .items
                    .iter()
                    .map(|line| CartItemView {
                        product_id: line.product_id.as_i32(),
                        name: line.name.clone(),
                        quantity: line.quantity,
                        unit_price: line.unit_price.to_string(),
                        line_price: format_amount(line.extended()),
                        image_url: catalog
                            .product(line.product_id)
                            .map_or_else(String::new, |product| product.image_url.clone()),
                    })
                    .collect(),
            })
        })
        .collect()
}

async fn shipping_form_view(session: &Session, gate: &CheckoutGate) -> Result<ShippingFormView> {
    let details = load_shipping_details(session).await?;
    let postal_code = match gate.state() {
        GateState::VerificationPending { postal_code, .. } => postal_code.to_string(),
        GateState::Ready { address, .. } | GateState::Blocked { address, .. } => {
            address.postal_code.to_string()
        }
        GateState::AddressIncomplete { .. } => String::new(),
    };
    Ok(details.map_or_else(
        || ShippingFormView {
            postal_code: postal_code.clone(),
            ..ShippingFormView::default()
        },
        |details| ShippingFormView {
            full_name: details.contact.full_name,
            email: details.contact.email.to_string(),
            phone: details.contact.phone,
            street: details.street,
            postal_code: postal_code.clone(),
        },
    ))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page (step 1: shipping).
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut gate = load_gate(&session).await?;

    // A verification computed for a different cart composition is stale;
    // drop it so the page prompts for a fresh check.
    let ids = cart.artisan_ids();
    if matches!(
        gate.state(),
        GateState::Ready { report, .. } | GateState::Blocked { report, .. } if !report.covers(&ids)
    ) {
        gate.reset();
        save_gate(&session, &gate).await?;
    }

    let form = shipping_form_view(&session, &gate).await?;
    Ok(CheckoutShowTemplate {
        cart: build_cart_view(&state, &cart),
        check: ShippingCheckView::from_gate(&gate, &ids),
        form,
        form_error: None,
    }
    .into_response())
}

/// Postal code form data.
#[derive(Debug, Deserialize)]
pub struct PostalCodeForm {
    pub postal_code: String,
}

/// Validate the postal code, run the lookup, and return the
/// shipping-compatibility panel (HTMX).
#[instrument(skip(state, session))]
pub async fn postal_code(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PostalCodeForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        // Cart emptied in another tab; send the buyer back.
        return Ok(([("HX-Redirect", "/cart")], ()).into_response());
    }

    let mut gate = load_gate(&session).await?;
    let request = match gate.submit_postal_code(&form.postal_code) {
        Ok(request) => request,
        Err(CheckoutError::InvalidPostalCode { .. }) => {
            // Rejected before any lookup; the gate did not transition.
            return Ok(ShippingCheckTemplate {
                check: ShippingCheckView {
                    format_error: Some(
                        "El código postal debe tener exactamente 5 dígitos.".to_owned(),
                    ),
                    ..ShippingCheckView::default()
                },
            }
            .into_response());
        }
        Err(err) => return Err(err.into()),
    };
    save_gate(&session, &gate).await?;

    let outcome = state.postal().resolve(&request.postal_code).await;

    let artisans = cart_artisans(&state, &cart)?;
    gate.apply_lookup(request.seq, outcome, &artisans);
    save_gate(&session, &gate).await?;

    Ok(ShippingCheckTemplate {
        check: ShippingCheckView::from_gate(&gate, &cart.artisan_ids()),
    }
    .into_response())
}

/// Contact form data for the shipping step.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
}

/// Proceed to the payment step. Only a `Ready` gate covering the current
/// cart allows this transition.
#[instrument(skip(state, session))]
pub async fn continue_to_payment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }
    let gate = load_gate(&session).await?;
    let ids = cart.artisan_ids();

    let render_with_error = |state: &AppState, message: &str, form: ShippingFormView| {
        Ok(CheckoutShowTemplate {
            cart: build_cart_view(state, &cart),
            check: ShippingCheckView::from_gate(&gate, &ids),
            form,
            form_error: Some(message.to_owned()),
        }
        .into_response())
    };

    let submitted = ShippingFormView {
        full_name: form.full_name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        phone: form.phone.trim().to_owned(),
        street: form.street.trim().to_owned(),
        postal_code: String::new(),
    };

    if submitted.full_name.is_empty() || submitted.phone.is_empty() || submitted.street.is_empty() {
        return render_with_error(&state, "Completa todos los campos de contacto.", submitted);
    }
    let Ok(email) = Email::parse(&submitted.email) else {
        return render_with_error(&state, "Correo electrónico inválido.", submitted);
    };

    if !gate.is_ready_for(&ids) {
        return render_with_error(
            &state,
            "Verifica la compatibilidad de envío antes de continuar.",
            submitted,
        );
    }

    save_shipping_details(
        &session,
        &ShippingDetails {
            contact: BuyerContact {
                full_name: submitted.full_name.clone(),
                email,
                phone: submitted.phone.clone(),
            },
            street: submitted.street.clone(),
        },
    )
    .await?;

    Ok(PaymentTemplate {
        groups: build_payment_groups(&state, &cart)?,
        total: format_amount(cart.total()),
        error: None,
    }
    .into_response())
}

/// Place the order.
///
/// The payment radios post as `payment_<artisan_id>=<method>`; every
/// artisan in the cart must have one.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }
    let mut gate = load_gate(&session).await?;
    let Some(details) = load_shipping_details(&session).await? else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    let selections = parse_selections(&form)?;
    let artisans = cart_artisans(&state, &cart)?;

    match state
        .orders()
        .place_order(&cart, &gate, &artisans, selections, details)
        .await
    {
        Ok(order) => {
            cart.clear();
            save_cart(&session, &cart).await?;
            gate.reset();
            save_gate(&session, &gate).await?;
            push_order_number(&session, &order.number).await?;

            Ok(ConfirmationTemplate {
                number: order.number,
                email: order.details.contact.email.to_string(),
            }
            .into_response())
        }
        Err(
            err @ (CheckoutError::IncompleteSelection { .. }
            | CheckoutError::UnsupportedPaymentMethod { .. }),
        ) => Ok(PaymentTemplate {
            groups: build_payment_groups(&state, &cart)?,
            total: format_amount(cart.total()),
            error: Some(payment_error_message(&err)),
        }
        .into_response()),
        Err(CheckoutError::NotReady) => Ok(Redirect::to("/checkout").into_response()),
        Err(err) => Err(err.into()),
    }
}

/// Extract `payment_<artisan_id>` selections from the submitted form.
fn parse_selections(form: &HashMap<String, String>) -> Result<HashMap<ArtisanId, PaymentMethod>> {
    let mut selections = HashMap::new();
    for (key, value) in form {
        let Some(raw_id) = key.strip_prefix("payment_") else {
            continue;
        };
        let id: i32 = raw_id
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid artisan id in field {key}")))?;
        let method: PaymentMethod = value
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid payment method {value}")))?;
        selections.insert(ArtisanId::new(id), method);
    }
    Ok(selections)
}

fn payment_error_message(err: &CheckoutError) -> String {
    match err {
        CheckoutError::IncompleteSelection { artisan } => {
            format!("Selecciona un método de pago para los productos de {artisan}.")
        }
        CheckoutError::UnsupportedPaymentMethod { artisan, method } => {
            format!("{artisan} no acepta pago con {}.", method.label())
        }
        _ => "No se pudo confirmar el pedido.".to_owned(),
    }
}
