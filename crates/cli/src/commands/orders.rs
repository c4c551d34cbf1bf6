//! Order status command.
//!
//! The transition is checked locally for the acting role before the API is
//! called, so an illegal move fails without a round trip.

use foodhub_core::order::authorize_transition;
use foodhub_core::{OrderId, OrderStatus, Role};

use super::{CliError, Context, print_json};

/// Move an order to `target`, acting as `role`.
///
/// # Errors
///
/// Returns [`CliError::Rejected`] when the transition is not allowed, or an
/// API error when the order cannot be fetched or updated.
pub async fn set_status(
    ctx: &Context,
    id: &OrderId,
    target: OrderStatus,
    role: Role,
) -> Result<(), CliError> {
    let order = ctx.api.get_order(&ctx.credentials, id).await?;
    authorize_transition(role, order.status, target)
        .map_err(|e| CliError::Rejected(e.to_string()))?;

    let updated = ctx
        .api
        .update_order_status(&ctx.credentials, id, target)
        .await?;
    tracing::info!(order_id = %id, from = %order.status, to = %updated.status, "Order status updated");
    print_json(&updated)
}
