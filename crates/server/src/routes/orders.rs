//! Order route handlers.
//!
//! Orders hit the document store directly and take no bearer token; the
//! asymmetry with the user/package routes is inherited behavior, kept
//! deliberately (see DESIGN.md) rather than unified here.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use parcelhub_core::{PackageId, UserId};

use crate::error::Result;
use crate::models::{NewOrder, Order};
use crate::state::AppState;

/// Order creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub package_id: PackageId,
    pub address_from: String,
    pub address_to: String,
}

/// Create an order document.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state
        .documents()
        .insert_order(NewOrder {
            user_id: request.user_id,
            package_id: request.package_id,
            address_from: request.address_from,
            address_to: request.address_to,
        })
        .await?;

    tracing::debug!(order_id = %order.id, "order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// List all order documents.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = state.documents().list_orders().await?;
    Ok(Json(orders))
}
