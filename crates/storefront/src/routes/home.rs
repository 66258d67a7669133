//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Featured products for the landing grid.
    pub featured: Vec<ProductCardView>,
}

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 4;

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let featured = state
        .catalog()
        .featured(FEATURED_COUNT)
        .iter()
        .map(|product| ProductCardView::build(product, state.catalog()))
        .collect();

    HomeTemplate { featured }
}
