use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use kirana_delivery::registry::{BulkToggleOutcome, LocationUpdate, RegistryError};
use kirana_delivery::transfer::{self, ExportFormat, ImportSummary};
use kirana_shared::models::DeliveryLocation;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub country: String,
    pub region: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkToggleRequest {
    pub ids: Vec<Uuid>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => AppError::NotFound(format!("delivery location {id}")),
            RegistryError::MissingCountry => AppError::BadRequest(err.to_string()),
        }
    }
}

fn parse_format(query: &FormatQuery) -> Result<ExportFormat, AppError> {
    query
        .format
        .parse::<ExportFormat>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/delivery-locations
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryLocation>>, AppError> {
    Ok(Json(state.registry.read().await.list()))
}

/// POST /v1/delivery-locations
pub async fn create_location(
    State(state): State<AppState>,
    Json(req): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<DeliveryLocation>), AppError> {
    let location = state
        .registry
        .write()
        .await
        .create(req.country, req.region, req.city)?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// PATCH /v1/delivery-locations/:id
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<LocationUpdate>,
) -> Result<Json<DeliveryLocation>, AppError> {
    let location = state.registry.write().await.update(&id, fields)?;
    Ok(Json(location))
}

/// POST /v1/delivery-locations/:id/toggle
pub async fn toggle_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryLocation>, AppError> {
    let location = state.registry.write().await.toggle(&id)?;
    Ok(Json(location))
}

/// DELETE /v1/delivery-locations/:id
/// Already-absent ids are a success, not an error.
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    state.registry.write().await.delete(&id);
    StatusCode::NO_CONTENT
}

/// POST /v1/delivery-locations/bulk/toggle
/// All ids are validated before anything changes; a missing id fails the
/// whole batch and the response names the offenders.
pub async fn bulk_toggle_locations(
    State(state): State<AppState>,
    Json(req): Json<BulkToggleRequest>,
) -> (StatusCode, Json<BulkToggleOutcome>) {
    let outcome = state
        .registry
        .write()
        .await
        .bulk_toggle(&req.ids, req.is_active);
    let status = if outcome.missing.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(outcome))
}

/// POST /v1/delivery-locations/bulk/delete
pub async fn bulk_delete_locations(
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> Json<serde_json::Value> {
    let removed = state.registry.write().await.bulk_delete(&req.ids);
    Json(serde_json::json!({ "removed": removed }))
}

/// POST /v1/delivery-locations/import?format=csv|json
pub async fn import_locations(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    body: String,
) -> Result<Json<ImportSummary>, AppError> {
    let format = parse_format(&query)?;
    let records =
        transfer::parse_records(format, &body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let summary = state.registry.write().await.bulk_import(records);
    Ok(Json(summary))
}

/// GET /v1/delivery-locations/export?format=csv|json
pub async fn export_locations(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, AppError> {
    let format = parse_format(&query)?;
    let payload = {
        let registry = state.registry.read().await;
        transfer::export(&registry, format).map_err(|e| AppError::BadRequest(e.to_string()))?
    };
    let content_type = match format {
        ExportFormat::Csv => "text/csv",
        ExportFormat::Json => "application/json",
    };
    Ok(([(header::CONTENT_TYPE, content_type)], payload).into_response())
}
