//! Store handlers
//!
//! Inventory and order endpoints under `/v2/store`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::domain::entities::{Inventory, Order, OrderId};
use crate::domain::ports::{ImageStore, Storage};
use crate::error::AppError;
use crate::AppState;

/// GET /v2/store/inventory
///
/// Pet counts keyed by status.
pub async fn get_inventory<S, IS>(
    State(state): State<AppState<S, IS>>,
) -> Result<Json<Inventory>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    let inventory = state.store_service.get_inventories_by_status().await?;
    Ok(Json(inventory))
}

/// POST /v2/store/order
pub async fn place_order<S, IS>(
    State(state): State<AppState<S, IS>>,
    Json(order): Json<Order>,
) -> Result<Json<Order>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    let placed = state.store_service.place_order(&order).await?;
    Ok(Json(placed))
}

/// GET /v2/store/order/:order_id
pub async fn get_order<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(order_id): Path<i64>,
) -> Result<Json<Order>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    let order = state
        .store_service
        .find_order_by_id(OrderId(order_id))
        .await?;
    Ok(Json(order))
}

/// DELETE /v2/store/order/:order_id
pub async fn delete_order<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(order_id): Path<i64>,
) -> Result<StatusCode, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state
        .store_service
        .delete_order_by_id(OrderId(order_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
