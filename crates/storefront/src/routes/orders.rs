//! Order route handlers (requires auth).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use foodhub_core::models::Order;
use foodhub_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::api::Page;
use crate::error::{Envelope, Result};
use crate::middleware::RequireAuth;
use crate::services::{self, OrderView};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// The signed-in user's orders.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PageParams>,
) -> Result<Envelope<Page<Order>>> {
    let orders = services::orders::list_orders(state.api(), &user, params.page).await?;
    Ok(Envelope::ok(orders))
}

/// One order as the signed-in user sees it.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Envelope<OrderView>> {
    let view = services::order_detail(state.api(), &user, &id).await?;
    Ok(Envelope::ok(view))
}

/// Move the order to a new status.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
    Json(form): Json<StatusForm>,
) -> Result<Envelope<OrderView>> {
    let view = services::update_order_status(state.api(), &user, &id, form.status).await?;
    Ok(Envelope::ok(view))
}
