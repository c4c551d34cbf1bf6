//! Review submission.
//!
//! A review can only be written for a meal of a delivered order, by the
//! customer who placed it. Submitting again for the same meal edits the
//! existing review instead of creating a second one.

use foodhub_core::models::{CreateReview, Review, UpdateReview};
use foodhub_core::review::{ReviewAction, ReviewDraft, ReviewError, can_review, review_action};
use foodhub_core::{MealId, OrderId, ReviewId};
use serde::Serialize;
use tracing::instrument;

use crate::api::{ApiClient, Page, ReviewQuery};
use crate::error::{AppError, add_breadcrumb};
use crate::models::CurrentUser;

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "review", rename_all = "camelCase")]
pub enum ReviewOutcome {
    Created(Review),
    Updated(Review),
}

impl ReviewOutcome {
    #[must_use]
    pub const fn review(&self) -> &Review {
        match self {
            Self::Created(review) | Self::Updated(review) => review,
        }
    }
}

/// Create or edit the signed-in customer's review of one meal in an order.
///
/// The draft is validated before anything is fetched. The order is then
/// loaded to decide whether the gate is open and whether a review already
/// exists.
///
/// # Errors
///
/// Returns [`AppError::Review`] for invalid input or a closed gate, and
/// [`AppError::Api`] when the API fails or rejects the review.
#[instrument(skip_all, fields(order_id = %order_id, meal_id = %meal_id, user_id = %user.id))]
pub async fn submit_review(
    api: &ApiClient,
    user: &CurrentUser,
    order_id: &OrderId,
    meal_id: &MealId,
    rating: u8,
    comment: Option<&str>,
) -> Result<ReviewOutcome, AppError> {
    let draft = ReviewDraft::new(rating, comment)?;
    let order = api.get_order(&user.credentials, order_id).await?;

    if !can_review(user.role, order.status) {
        return Err(ReviewError::NotAllowed.into());
    }

    let action = review_action(user.role, &order, meal_id).ok_or(ReviewError::MealNotInOrder)?;
    let (rating, comment) = draft.into_parts();

    let outcome = match action {
        ReviewAction::Create => {
            let payload = CreateReview {
                customer_id: user.id.clone(),
                meal_id: meal_id.clone(),
                order_id: order_id.clone(),
                rating,
                comment,
            };
            ReviewOutcome::Created(api.create_review(&user.credentials, &payload).await?)
        }
        ReviewAction::Edit(existing) => {
            let payload = UpdateReview {
                rating: Some(rating),
                comment,
            };
            ReviewOutcome::Updated(
                api.update_review(&user.credentials, &existing.id, &payload)
                    .await?,
            )
        }
    };

    tracing::info!(review_id = %outcome.review().id, rating, "Review saved");
    add_breadcrumb(
        "review",
        "Review saved",
        Some(&[("review_id", outcome.review().id.as_str())]),
    );
    Ok(outcome)
}

/// Reviews written by the signed-in user.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_own_reviews(
    api: &ApiClient,
    user: &CurrentUser,
    page: Option<u32>,
) -> Result<Page<Review>, AppError> {
    let query = ReviewQuery {
        customer_id: Some(user.id.clone()),
        page,
        ..ReviewQuery::default()
    };
    Ok(api.list_reviews(Some(&user.credentials), &query).await?)
}

/// Delete one of the signed-in user's reviews.
///
/// # Errors
///
/// Returns an error if the API refuses or cannot be reached.
#[instrument(skip_all, fields(review_id = %review_id, user_id = %user.id))]
pub async fn delete_review(
    api: &ApiClient,
    user: &CurrentUser,
    review_id: &ReviewId,
) -> Result<(), AppError> {
    api.delete_review(&user.credentials, review_id).await?;
    tracing::info!("Review deleted");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_with_action() {
        let review: Review = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "customerId": "u1",
            "mealId": "m1",
            "orderId": "o1",
            "rating": 5,
            "createdAt": "2025-02-01T10:00:00Z"
        }))
        .unwrap();

        let json = serde_json::to_value(ReviewOutcome::Updated(review)).unwrap();
        assert_eq!(json["action"], "updated");
        assert_eq!(json["review"]["rating"], 5);
    }
}
