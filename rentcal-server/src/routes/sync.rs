//! Sync trigger endpoint

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use rentcal_core::SyncReport;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/properties/{id}/sync", post(sync_property))
}

/// POST /properties/:id/sync - Import every configured feed of a property
///
/// Runs to completion before responding. The body carries the total
/// `imported` count plus one entry per feed.
async fn sync_property(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> Result<Json<SyncReport>, AppError> {
    let report = state.syncer().sync_by_id(&property_id).await?;
    Ok(Json(report))
}
