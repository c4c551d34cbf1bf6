//! Review gating and draft validation.
//!
//! Only customers may review, and only meals from orders that reached
//! `Delivered`. If a review already exists for the meal within that order the
//! action becomes an edit instead of a create.

use thiserror::Error;

use crate::models::{Order, Review};
use crate::types::{MealId, OrderStatus, Role};

/// Lowest accepted star rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted star rating.
pub const MAX_RATING: u8 = 5;

/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Review draft validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Please select a rating.")]
    MissingRating,

    #[error("rating must be between {MIN_RATING} and {MAX_RATING}")]
    RatingOutOfRange(u8),

    #[error("comment must be at most {MAX_COMMENT_LENGTH} characters")]
    CommentTooLong,

    #[error("Only customers can review delivered orders.")]
    NotAllowed,

    #[error("This meal is not part of the order.")]
    MealNotInOrder,
}

/// What reviewing a meal of an order means right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction<'a> {
    /// No review exists yet.
    Create,
    /// Edit the existing review.
    Edit(&'a Review),
}

/// Whether a user with `role` may review an order in `status`.
#[must_use]
pub fn can_review(role: Role, status: OrderStatus) -> bool {
    role == Role::Customer && status == OrderStatus::Delivered
}

/// Resolve the review action for one meal of an order.
///
/// Returns `None` when the role/status gate is closed or the meal is not a
/// line of the order.
#[must_use]
pub fn review_action<'a>(role: Role, order: &'a Order, meal_id: &MealId) -> Option<ReviewAction<'a>> {
    if !can_review(role, order.status) || !order.contains_meal(meal_id) {
        return None;
    }
    Some(
        order
            .review_for(meal_id)
            .map_or(ReviewAction::Create, ReviewAction::Edit),
    )
}

/// A validated rating and optional comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    rating: u8,
    comment: Option<String>,
}

impl ReviewDraft {
    /// Validate user input.
    ///
    /// A rating of 0 means "not selected". The comment is trimmed and a blank
    /// comment becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError`] for a missing or out-of-range rating, or a
    /// comment longer than [`MAX_COMMENT_LENGTH`] characters.
    pub fn new(rating: u8, comment: Option<&str>) -> Result<Self, ReviewError> {
        if rating == 0 {
            return Err(ReviewError::MissingRating);
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ReviewError::RatingOutOfRange(rating));
        }

        let comment = comment.map(str::trim).filter(|c| !c.is_empty());
        if comment.is_some_and(|c| c.chars().count() > MAX_COMMENT_LENGTH) {
            return Err(ReviewError::CommentTooLong);
        }

        Ok(Self {
            rating,
            comment: comment.map(String::from),
        })
    }

    #[must_use]
    pub const fn rating(&self) -> u8 {
        self.rating
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    #[must_use]
    pub fn into_parts(self) -> (u8, Option<String>) {
        (self.rating, self.comment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(status: &str, reviews: serde_json::Value) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": "o1",
            "customerId": "u1",
            "providerId": "p1",
            "orderItems": [
                { "mealId": "m1", "quantity": 2, "price": 100 },
                { "mealId": "m2", "quantity": 1, "price": 50 }
            ],
            "totalAmount": "312.50",
            "address": "Dhaka",
            "paymentType": "COD",
            "status": status,
            "reviews": reviews
        }))
        .unwrap()
    }

    #[test]
    fn test_gate_requires_customer_and_delivered() {
        assert!(can_review(Role::Customer, OrderStatus::Delivered));
        assert!(!can_review(Role::Provider, OrderStatus::Delivered));
        assert!(!can_review(Role::Admin, OrderStatus::Delivered));
        for status in [
            OrderStatus::Placed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
            OrderStatus::Cancelled,
        ] {
            assert!(!can_review(Role::Customer, status));
        }
    }

    #[test]
    fn test_action_is_create_then_edit() {
        let fresh = order("DELIVERED", serde_json::json!([]));
        assert_eq!(
            review_action(Role::Customer, &fresh, &MealId::new("m1")),
            Some(ReviewAction::Create)
        );

        let reviewed = order(
            "DELIVERED",
            serde_json::json!([{
                "id": "r1",
                "customerId": "u1",
                "mealId": "m1",
                "orderId": "o1",
                "rating": 5,
                "createdAt": "2025-02-01T10:00:00Z"
            }]),
        );
        assert!(matches!(
            review_action(Role::Customer, &reviewed, &MealId::new("m1")),
            Some(ReviewAction::Edit(review)) if review.rating == 5
        ));
        assert_eq!(
            review_action(Role::Customer, &reviewed, &MealId::new("m2")),
            Some(ReviewAction::Create)
        );
    }

    #[test]
    fn test_action_absent_when_gated() {
        let preparing = order("PREPARING", serde_json::json!([]));
        assert_eq!(
            review_action(Role::Customer, &preparing, &MealId::new("m1")),
            None
        );

        let delivered = order("DELIVERED", serde_json::json!([]));
        assert_eq!(
            review_action(Role::Provider, &delivered, &MealId::new("m1")),
            None
        );
        assert_eq!(
            review_action(Role::Customer, &delivered, &MealId::new("other")),
            None
        );
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(ReviewDraft::new(0, None), Err(ReviewError::MissingRating));
        assert_eq!(
            ReviewDraft::new(6, None),
            Err(ReviewError::RatingOutOfRange(6))
        );

        let blank = ReviewDraft::new(4, Some("   ")).unwrap();
        assert_eq!(blank.comment(), None);

        let trimmed = ReviewDraft::new(5, Some("  Great biryani ")).unwrap();
        assert_eq!(trimmed.comment(), Some("Great biryani"));

        let limit = "a".repeat(MAX_COMMENT_LENGTH);
        assert!(ReviewDraft::new(3, Some(&limit)).is_ok());
        let over = "a".repeat(MAX_COMMENT_LENGTH + 1);
        assert_eq!(
            ReviewDraft::new(3, Some(&over)),
            Err(ReviewError::CommentTooLong)
        );
    }
}
