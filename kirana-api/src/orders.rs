use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use kirana_delivery::DeliveryGuard;
use kirana_order::prioritizer::{OrderPrioritizer, SortMode};
use kirana_order::availability;
use kirana_shared::models::{Order, OrderAction, OrderStatus};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortMode,
}

#[derive(Debug, Deserialize)]
pub struct InvokeActionRequest {
    pub action: OrderAction,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub code: &'static str,
    pub order_id: Uuid,
    pub status: OrderStatus,
}

/// Order enriched with what the presentation layer needs to render action
/// buttons: which actions are structurally legal, whether the guard blocks
/// them, and whether a mutation is already in flight. Eligibility and
/// guard blocking stay separate fields so the UI can word them apart.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub available_actions: Vec<OrderAction>,
    pub delivery_blocked: bool,
    pub in_flight_action: Option<OrderAction>,
}

impl OrderResponse {
    async fn build(order: Order, state: &AppState) -> Self {
        let delivery_blocked = {
            let registry = state.registry.read().await;
            !DeliveryGuard::permits(&order, &registry)
        };
        let in_flight_action = state.coordinator.in_flight_action(&order.id);
        Self {
            available_actions: availability::available_actions(order.status),
            delivery_blocked,
            in_flight_action,
            order,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/orders
/// List orders for operator review, optionally filtered server-side and
/// sorted by priority or recency.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = match query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(term) => state.gateway.list_orders(Some(term)).await?,
        None => {
            state.coordinator.refresh().await?;
            state.store.read().await.all()
        }
    };

    let sorted = OrderPrioritizer::sorted(orders, query.sort);
    let mut responses = Vec::with_capacity(sorted.len());
    for order in sorted {
        responses.push(OrderResponse::build(order, &state).await);
    }
    Ok(Json(responses))
}

/// GET /v1/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let known = state.store.read().await.get(&order_id).cloned();
    let order = match known {
        Some(order) => order,
        None => {
            // The local copy can lag the order service; reload once
            state.coordinator.refresh().await?;
            state
                .store
                .read()
                .await
                .get(&order_id)
                .cloned()
                .ok_or(kirana_core::CoreError::NotFound(order_id))?
        }
    };
    Ok(Json(OrderResponse::build(order, &state).await))
}

/// POST /v1/orders/:id/actions
/// Invoke a lifecycle action; the coordinator validates, applies remotely,
/// and reloads the collection on success.
pub async fn invoke_action(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<InvokeActionRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let status = state
        .coordinator
        .request_transition(order_id, req.action)
        .await?;
    Ok(Json(TransitionResponse {
        code: "ok",
        order_id,
        status,
    }))
}
