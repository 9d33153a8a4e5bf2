//! Development-only introspection endpoints.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::catalog::CatalogState;
use crate::state::AppState;

/// Current catalog state as JSON.
#[instrument(skip(state))]
pub async fn catalog(State(state): State<AppState>) -> Json<CatalogState> {
    Json(state.catalog().snapshot().await)
}
