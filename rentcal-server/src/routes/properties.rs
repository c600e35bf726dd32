//! Property and booking endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;

use rentcal_core::{Booking, BookingStore, Error, Property};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_properties))
        .route(
            "/properties/{id}",
            get(get_property).put(put_property).delete(delete_property),
        )
        .route("/properties/{id}/bookings", get(list_bookings))
}

/// Request body for creating or replacing a property
#[derive(Deserialize)]
pub struct PropertyRequest {
    pub name: String,
    pub airbnb_ical_url: Option<String>,
    pub vrbo_ical_url: Option<String>,
    pub other_ical_url: Option<String>,
}

/// GET /properties - List all properties
async fn list_properties(State(state): State<AppState>) -> Result<Json<Vec<Property>>, AppError> {
    Ok(Json(state.store().list_properties().await?))
}

/// GET /properties/:id
async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Property>, AppError> {
    let property = state
        .store()
        .get_property(&id)
        .await?
        .ok_or_else(|| Error::PropertyNotFound(id.clone()))?;
    Ok(Json(property))
}

/// PUT /properties/:id - Create or replace a property and its feed URLs
async fn put_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PropertyRequest>,
) -> Result<Json<Property>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::bad_request("Property name must not be empty"));
    }

    let property = Property {
        id,
        name: req.name.trim().to_string(),
        airbnb_ical_url: feed_url("airbnb_ical_url", req.airbnb_ical_url)?,
        vrbo_ical_url: feed_url("vrbo_ical_url", req.vrbo_ical_url)?,
        other_ical_url: feed_url("other_ical_url", req.other_ical_url)?,
    };

    state.store().upsert_property(property.clone()).await?;
    tracing::info!(property_id = %property.id, "Saved property");

    Ok(Json(property))
}

/// DELETE /properties/:id - Remove a property and its bookings
async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Property>, AppError> {
    let property = state
        .store()
        .get_property(&id)
        .await?
        .ok_or_else(|| Error::PropertyNotFound(id.clone()))?;
    state.store().delete_property(&id).await?;
    Ok(Json(property))
}

/// GET /properties/:id/bookings - Bookings ordered by check-in
async fn list_bookings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    if state.store().get_property(&id).await?.is_none() {
        return Err(Error::PropertyNotFound(id).into());
    }
    Ok(Json(state.store().list_bookings(&id).await?))
}

/// Blank means "not configured"; anything else must be an http(s) or webcal URL.
fn feed_url(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    let Some(value) = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };

    let parsed = url::Url::parse(&value)
        .map_err(|e| AppError::bad_request(format!("Invalid {field} '{value}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" | "webcal" => Ok(Some(value)),
        scheme => Err(AppError::bad_request(format!(
            "Invalid {field} '{value}': unsupported scheme '{scheme}'"
        ))),
    }
}
