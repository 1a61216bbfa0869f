//! Order management routes.
//!
//! Orders are read by their human-facing reference (`ORD-...`) but status
//! transitions address the numeric id, mirroring the backend interface.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tower_sessions::Session;

use velvet_loom_core::{Order, OrderId, OrderStatus, OrderUpdate};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::routes::proxied;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub show_archived: bool,
}

/// GET /orders?show_archived=
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    let orders = state
        .backend()
        .list_orders(query.show_archived, &admin.access_token)
        .await;
    Ok(Json(proxied(&session, orders).await?))
}

/// GET /orders/{uid}
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(order_uid): Path<String>,
) -> Result<Json<Order>> {
    let order = state
        .backend()
        .get_order(&order_uid, &admin.access_token)
        .await;
    Ok(Json(proxied(&session, order).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

/// PUT /orders/{id}
///
/// Transitions an order to `pending`, `delivered`, or `cancelled`. Any
/// other value is refused before the backend is called.
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Order>> {
    let status: OrderStatus = body.status.parse().map_err(|_| {
        AppError::BadRequest(format!("'{}' is not a valid order status.", body.status))
    })?;

    let updated = state
        .backend()
        .update_order(OrderId::new(id), OrderUpdate { status }, &admin.access_token)
        .await;
    let updated = proxied(&session, updated).await?;

    tracing::info!(
        order_uid = %updated.order_uid,
        status = %updated.status,
        "Order status updated"
    );
    Ok(Json(updated))
}
