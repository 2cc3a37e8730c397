//! REST handlers for shipments, dictionaries and carrier selection.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    Carrier, FixedDirection, Order, SelectionKind, Shipment, TarifficationType,
};
use crate::selection::{CarrierSelectionService, SelectionOutcome};
use crate::store::TableCounts;

pub type AppState = Arc<CarrierSelectionService>;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ShipmentResponse {
    pub shipment_id: Uuid,
    pub number: String,
    pub status: String,
    pub shipping_date: Option<String>,
    pub delivery_date: Option<String>,
    pub pallets_count: i32,
    pub weight_kg: f64,
    pub carrier_id: Option<Uuid>,
    pub vehicle_type_id: Option<Uuid>,
    pub tariffication_type: Option<TarifficationType>,
    pub delivery_cost: Option<f64>,
}

impl From<Shipment> for ShipmentResponse {
    fn from(s: Shipment) -> Self {
        Self {
            shipment_id: s.shipment_id,
            number: s.number,
            status: format!("{:?}", s.status),
            shipping_date: s.shipping_date.map(|d| d.to_string()),
            delivery_date: s.delivery_date.map(|d| d.to_string()),
            pallets_count: s.pallets_count,
            weight_kg: s.weight_kg,
            carrier_id: s.carrier_id,
            vehicle_type_id: s.vehicle_type_id,
            tariffication_type: s.tariffication_type,
            delivery_cost: s.delivery_cost,
        }
    }
}

#[derive(Serialize)]
pub struct ShipmentDetailResponse {
    pub shipment: ShipmentResponse,
    pub orders: Vec<Order>,
}

#[derive(Serialize)]
pub struct SelectionResponse {
    pub carrier_id: Option<Uuid>,
    pub selection_kind: String,
    pub tariff_id: Option<Uuid>,
    pub delivery_cost: Option<f64>,
    pub vehicle_type_id: Option<Uuid>,
}

impl SelectionResponse {
    fn from_outcome(outcome: &SelectionOutcome, pallets: i32) -> Self {
        Self {
            carrier_id: outcome.carrier_id,
            selection_kind: match outcome.kind {
                SelectionKind::None => "None",
                SelectionKind::FixedDirection => "FixedDirection",
                SelectionKind::BestCost => "BestCost",
            }
            .to_string(),
            tariff_id: outcome.tariff.as_ref().map(|t| t.tariff_id),
            delivery_cost: outcome.tariff.as_ref().and_then(|t| t.delivery_cost(pallets)),
            vehicle_type_id: outcome.vehicle_type_id,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal(e: anyhow::Error) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: e.to_string() }),
    )
}

fn not_found(msg: String) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: msg }))
}

// ============================================================================
// Query / Body Parameters
// ============================================================================

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize, Default)]
pub struct AssignRequest {
    #[serde(default)]
    pub ignored_carrier_ids: Vec<Uuid>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/v1/stats
pub async fn get_stats(State(service): State<AppState>) -> Result<Json<TableCounts>, ApiError> {
    service.store().counts().await.map(Json).map_err(internal)
}

/// GET /api/v1/shipments
pub async fn list_shipments(
    State(service): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<ShipmentResponse>>, ApiError> {
    let limit = params.limit.unwrap_or(100);
    let shipments = service.store().list_shipments(limit).await.map_err(internal)?;
    Ok(Json(shipments.into_iter().map(ShipmentResponse::from).collect()))
}

/// GET /api/v1/shipments/:id
pub async fn get_shipment(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShipmentDetailResponse>, ApiError> {
    let shipment = service
        .store()
        .get_shipment(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found(format!("Shipment not found: {id}")))?;
    let orders = service.store().orders_for_shipment(id).await.map_err(internal)?;
    Ok(Json(ShipmentDetailResponse {
        shipment: shipment.into(),
        orders,
    }))
}

/// GET /api/v1/carriers
pub async fn list_carriers(
    State(service): State<AppState>,
) -> Result<Json<Vec<Carrier>>, ApiError> {
    service.store().carriers().await.map(Json).map_err(internal)
}

/// GET /api/v1/fixed-directions
pub async fn list_fixed_directions(
    State(service): State<AppState>,
) -> Result<Json<Vec<FixedDirection>>, ApiError> {
    service.store().fixed_directions().await.map(Json).map_err(internal)
}

async fn load_shipment(service: &AppState, id: Uuid) -> Result<Shipment, ApiError> {
    service
        .store()
        .get_shipment(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found(format!("Shipment not found: {id}")))
}

fn require_complete(shipment: &Shipment) -> Result<(), ApiError> {
    if shipment.shipping_date.is_none() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: format!(
                    "Shipment {} has no shipping date and is excluded from selection",
                    shipment.shipment_id
                ),
            }),
        ));
    }
    Ok(())
}

/// POST /api/v1/shipments/:id/carrier/find (dry run, nothing is written)
pub async fn find_carrier(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<AssignRequest>>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let shipment = load_shipment(&service, id).await?;
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let outcome = service
        .find_carrier(id, &req.ignored_carrier_ids)
        .await
        .map_err(internal)?;
    Ok(Json(SelectionResponse::from_outcome(&outcome, shipment.pallets_count)))
}

/// POST /api/v1/shipments/:id/carrier/assign
pub async fn assign_carrier(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<AssignRequest>>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let shipment = load_shipment(&service, id).await?;
    require_complete(&shipment)?;
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let outcome = service
        .find_and_update_carrier(id, &req.ignored_carrier_ids)
        .await
        .map_err(internal)?;
    if outcome.carrier_id.is_none() {
        return Err(not_found(format!("No carrier qualifies for shipment {id}")));
    }
    Ok(Json(SelectionResponse::from_outcome(&outcome, shipment.pallets_count)))
}

/// POST /api/v1/shipments/:id/carrier/reject rejects the current carrier
/// and reassigns excluding it
pub async fn reject_carrier(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let shipment = load_shipment(&service, id).await?;
    require_complete(&shipment)?;
    let Some(current) = shipment.carrier_id else {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Shipment {id} has no carrier to reject"),
            }),
        ));
    };
    let outcome = service
        .find_and_update_carrier(id, &[current])
        .await
        .map_err(internal)?;
    if outcome.carrier_id.is_none() {
        return Err(not_found(format!(
            "No replacement carrier qualifies for shipment {id}"
        )));
    }
    Ok(Json(SelectionResponse::from_outcome(&outcome, shipment.pallets_count)))
}

/// POST /api/v1/shipments/:id/carrier/confirm
pub async fn confirm_carrier(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let shipment = load_shipment(&service, id).await?;
    if shipment.carrier_id.is_none() {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Shipment {id} has no carrier to confirm"),
            }),
        ));
    }
    service.confirm_carrier(id).await.map_err(internal)?;
    Ok(Json(serde_json::json!({"status": "confirmed"})))
}

/// Build the REST router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/stats", get(get_stats))
        .route("/api/v1/shipments", get(list_shipments))
        .route("/api/v1/shipments/:id", get(get_shipment))
        .route("/api/v1/carriers", get(list_carriers))
        .route("/api/v1/fixed-directions", get(list_fixed_directions))
        .route("/api/v1/shipments/:id/carrier/find", post(find_carrier))
        .route("/api/v1/shipments/:id/carrier/assign", post(assign_carrier))
        .route("/api/v1/shipments/:id/carrier/reject", post(reject_carrier))
        .route("/api/v1/shipments/:id/carrier/confirm", post(confirm_carrier))
        .with_state(state)
}
