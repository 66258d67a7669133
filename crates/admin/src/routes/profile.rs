//! Artisan profile route handlers.
//!
//! The profile form edits the fields that feed checkout: shipping zone,
//! accepted payment methods, and the shipping policy text.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use tianguis_core::{Artisan, PaymentMethod, ShippingZone};

use crate::data::ProfileUpdate;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::dashboard::ArtisanView;
use crate::state::AppState;

/// Profile form display data.
#[derive(Debug, Clone)]
pub struct ProfileFormView {
    pub colony: String,
    pub municipality: String,
    pub state: String,
    pub zone_colony: bool,
    pub zone_municipality: bool,
    pub zone_state: bool,
    pub accepts_cash: bool,
    pub accepts_card: bool,
    pub shipping_policy: String,
}

impl From<&Artisan> for ProfileFormView {
    fn from(artisan: &Artisan) -> Self {
        Self {
            colony: artisan.colony.clone(),
            municipality: artisan.municipality.clone(),
            state: artisan.state.clone(),
            zone_colony: artisan.shipping_zone == ShippingZone::ColonyOnly,
            zone_municipality: artisan.shipping_zone == ShippingZone::MunicipalityWide,
            zone_state: artisan.shipping_zone == ShippingZone::StateWide,
            accepts_cash: artisan.accepts(PaymentMethod::Cash),
            accepts_card: artisan.accepts(PaymentMethod::Card),
            shipping_policy: artisan.shipping_policy.clone(),
        }
    }
}

/// Artisan profile template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub artisan: ArtisanView,
    pub form: ProfileFormView,
    pub saved: bool,
}

async fn render(state: &AppState, id: i32, saved: bool) -> Result<ProfileTemplate> {
    let artisan = state
        .data()
        .artisan(id.into())
        .await
        .ok_or_else(|| AppError::NotFound(format!("artisan {id}")))?;

    Ok(ProfileTemplate {
        artisan: ArtisanView {
            id: artisan.id.as_i32(),
            name: artisan.display_name.clone(),
            location: artisan.location(),
        },
        form: ProfileFormView::from(&artisan),
        saved,
    })
}

/// Profile form handler.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<ProfileTemplate> {
    render(&state, id, false).await
}

/// Profile update form data. Checkboxes are absent when unchecked.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub shipping_zone: String,
    pub accept_cash: Option<String>,
    pub accept_card: Option<String>,
    pub shipping_policy: String,
}

/// Apply a profile update and re-render the form.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ProfileForm>,
) -> Result<ProfileTemplate> {
    let shipping_zone: ShippingZone = form
        .shipping_zone
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid shipping zone {}", form.shipping_zone)))?;

    let mut payment_methods = Vec::new();
    if form.accept_cash.is_some() {
        payment_methods.push(PaymentMethod::Cash);
    }
    if form.accept_card.is_some() {
        payment_methods.push(PaymentMethod::Card);
    }

    state
        .data()
        .update_profile(
            id.into(),
            ProfileUpdate {
                shipping_zone,
                payment_methods,
                shipping_policy: form.shipping_policy.trim().to_owned(),
            },
        )
        .await?;

    tracing::info!(artisan = id, zone = %shipping_zone, "artisan profile updated");
    render(&state, id, true).await
}
