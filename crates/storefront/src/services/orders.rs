//! Order detail views and status transitions.

use foodhub_core::models::{Order, Review};
use foodhub_core::order::{allowed_transitions, authorize_transition};
use foodhub_core::review::{ReviewAction, review_action};
use foodhub_core::{MealId, OrderId, OrderStatus, Role};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::api::{ApiClient, OrderQuery, Page};
use crate::error::AppError;
use crate::models::CurrentUser;

/// An order as one viewer sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order: Order,
    pub status_label: String,
    /// Statuses this viewer may move the order to.
    pub allowed_transitions: Vec<OrderStatus>,
    /// Whether this viewer may cancel the order.
    pub can_cancel: bool,
    pub items: Vec<OrderItemView>,
}

/// One order line with its review state for the viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub meal_id: MealId,
    pub name: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    pub line_total: Decimal,
    pub review: ReviewState,
}

/// What the viewer can do about reviewing one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ReviewState {
    Unavailable,
    Create,
    Edit { review: Review },
}

impl OrderView {
    /// Build the view of `order` for a viewer with `role`.
    #[must_use]
    pub fn new(order: Order, role: Role) -> Self {
        let allowed = allowed_transitions(role, order.status);
        let can_cancel = allowed.contains(&OrderStatus::Cancelled);

        let items = order
            .order_items
            .iter()
            .map(|item| OrderItemView {
                meal_id: item.meal_id.clone(),
                name: item.meal.as_ref().map(|meal| meal.name.clone()),
                quantity: item.quantity,
                price: item.price,
                line_total: item.price * Decimal::from(item.quantity),
                review: match review_action(role, &order, &item.meal_id) {
                    None => ReviewState::Unavailable,
                    Some(ReviewAction::Create) => ReviewState::Create,
                    Some(ReviewAction::Edit(review)) => ReviewState::Edit {
                        review: review.clone(),
                    },
                },
            })
            .collect();

        Self {
            status_label: order.status.label(),
            allowed_transitions: allowed,
            can_cancel,
            items,
            order,
        }
    }
}

/// The signed-in user's orders.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_orders(
    api: &ApiClient,
    user: &CurrentUser,
    page: Option<u32>,
) -> Result<Page<Order>, AppError> {
    let query = OrderQuery {
        customer_id: (user.role == Role::Customer).then(|| user.id.clone()),
        page,
        sort_by: Some("createdAt".to_string()),
        sort_order: Some("desc".to_string()),
        ..OrderQuery::default()
    };
    Ok(api.list_orders(&user.credentials, &query).await?)
}

/// Fetch one order as the signed-in user sees it.
///
/// # Errors
///
/// Returns an error if the order does not exist or the request fails.
#[instrument(skip_all, fields(order_id = %order_id, user_id = %user.id))]
pub async fn order_detail(
    api: &ApiClient,
    user: &CurrentUser,
    order_id: &OrderId,
) -> Result<OrderView, AppError> {
    let order = api.get_order(&user.credentials, order_id).await?;
    Ok(OrderView::new(order, user.role))
}

/// Move an order to `target` on behalf of the signed-in user.
///
/// The transition is checked against the order's current status and the
/// user's role before anything is sent. Failures are returned as-is; nothing
/// is retried.
///
/// # Errors
///
/// Returns [`AppError::Transition`] when the move is not allowed, or
/// [`AppError::Api`] when the API refuses it or cannot be reached.
#[instrument(skip_all, fields(order_id = %order_id, target = %target, role = %user.role))]
pub async fn update_order_status(
    api: &ApiClient,
    user: &CurrentUser,
    order_id: &OrderId,
    target: OrderStatus,
) -> Result<OrderView, AppError> {
    let current = api.get_order(&user.credentials, order_id).await?;
    authorize_transition(user.role, current.status, target)?;

    let mut updated = api
        .update_order_status(&user.credentials, order_id, target)
        .await?;

    // The status endpoint may answer without associations.
    if updated.order_items.is_empty() {
        updated.order_items = current.order_items;
    }
    if updated.reviews.is_empty() {
        updated.reviews = current.reviews;
    }

    tracing::info!(from = %current.status, to = %updated.status, "Order status updated");
    Ok(OrderView::new(updated, user.role))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(status: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": "o1",
            "customerId": "u1",
            "providerId": "p1",
            "orderItems": [
                { "mealId": "m1", "quantity": 2, "price": "100", "meal": { "id": "m1", "name": "Kacchi" } },
                { "mealId": "m2", "quantity": 1, "price": "50" }
            ],
            "totalAmount": "312.50",
            "address": "Dhaka",
            "paymentType": "COD",
            "status": status,
            "reviews": [{
                "id": "r1",
                "customerId": "u1",
                "mealId": "m2",
                "orderId": "o1",
                "rating": 4,
                "createdAt": "2025-02-01T10:00:00Z"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_customer_view_of_placed_order() {
        let view = OrderView::new(order("PLACED"), Role::Customer);
        assert_eq!(view.allowed_transitions, vec![OrderStatus::Cancelled]);
        assert!(view.can_cancel);
        assert_eq!(view.status_label, OrderStatus::Placed.label());
        assert!(
            view.items
                .iter()
                .all(|item| item.review == ReviewState::Unavailable)
        );
    }

    #[test]
    fn test_provider_view_of_ready_order() {
        let view = OrderView::new(order("READY"), Role::Provider);
        assert_eq!(
            view.allowed_transitions,
            vec![
                OrderStatus::OutForDelivery,
                OrderStatus::Delivered,
                OrderStatus::Cancelled
            ]
        );
        assert!(view.can_cancel);
    }

    #[test]
    fn test_admin_view_is_read_only() {
        let view = OrderView::new(order("PREPARING"), Role::Admin);
        assert!(view.allowed_transitions.is_empty());
        assert!(!view.can_cancel);
    }

    #[test]
    fn test_delivered_view_offers_create_and_edit() {
        let view = OrderView::new(order("DELIVERED"), Role::Customer);
        assert!(view.allowed_transitions.is_empty());

        let first = view.items.first().unwrap();
        assert_eq!(first.review, ReviewState::Create);
        assert_eq!(first.line_total, Decimal::new(200, 0));
        assert_eq!(first.name.as_deref(), Some("Kacchi"));

        let second = view.items.get(1).unwrap();
        assert!(matches!(&second.review, ReviewState::Edit { review } if review.rating == 4));
    }

    #[test]
    fn test_review_state_serializes_tagged() {
        let json = serde_json::to_value(ReviewState::Create).unwrap();
        assert_eq!(json, serde_json::json!({ "action": "create" }));
    }
}
