//! Review route handlers (requires auth).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use foodhub_core::models::Review;
use foodhub_core::{MealId, OrderId, ReviewId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::orders::PageParams;
use crate::api::Page;
use crate::error::{Envelope, Result};
use crate::middleware::RequireAuth;
use crate::services::{self, ReviewOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    pub meal_id: MealId,
    /// Missing means "not selected".
    #[serde(default)]
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

/// Create or edit the review of one meal in a delivered order.
#[instrument(skip(state, user, form), fields(user_id = %user.id, meal_id = %form.meal_id))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
    Json(form): Json<ReviewForm>,
) -> Result<Envelope<ReviewOutcome>> {
    let outcome = services::submit_review(
        state.api(),
        &user,
        &order_id,
        &form.meal_id,
        form.rating,
        form.comment.as_deref(),
    )
    .await?;
    Ok(Envelope::ok(outcome))
}

/// Reviews written by the signed-in user.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PageParams>,
) -> Result<Envelope<Page<Review>>> {
    let reviews = services::reviews::list_own_reviews(state.api(), &user, params.page).await?;
    Ok(Envelope::ok(reviews))
}

/// Delete one of the signed-in user's reviews.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ReviewId>,
) -> Result<Envelope<Deleted>> {
    services::reviews::delete_review(state.api(), &user, &id).await?;
    Ok(Envelope::ok(Deleted {
        message: "Review deleted.",
    }))
}
