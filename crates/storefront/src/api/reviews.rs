//! Review endpoints.

use foodhub_core::models::{CreateReview, MealReviewSummary, Review, UpdateReview};
use foodhub_core::{MealId, OrderId, ReviewId, UserId};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError, Credentials, Page};

/// Filters for the review list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_id: Option<MealId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ApiClient {
    /// List reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, credentials))]
    pub async fn list_reviews(
        &self,
        credentials: Option<&Credentials>,
        query: &ReviewQuery,
    ) -> Result<Page<Review>, ApiError> {
        let request = self
            .request(Method::GET, &["reviews"], credentials)?
            .query(query);
        self.execute_list(request, "Failed to fetch reviews.").await
    }

    /// Average rating and review count for a meal.
    ///
    /// # Errors
    ///
    /// Returns an error if the reviews cannot be listed.
    #[instrument(skip(self), fields(meal_id = %meal_id))]
    pub async fn meal_review_summary(&self, meal_id: &MealId) -> Result<MealReviewSummary, ApiError> {
        let query = ReviewQuery {
            meal_id: Some(meal_id.clone()),
            ..ReviewQuery::default()
        };
        let page = self.list_reviews(None, &query).await?;
        Ok(summarize(&page.items))
    }

    /// Create a review.
    ///
    /// # Errors
    ///
    /// Returns the API's message (or "Failed to submit review.") on rejection.
    #[instrument(skip(self, credentials, payload), fields(order_id = %payload.order_id, meal_id = %payload.meal_id))]
    pub async fn create_review(
        &self,
        credentials: &Credentials,
        payload: &CreateReview,
    ) -> Result<Review, ApiError> {
        let request = self
            .request(Method::POST, &["reviews"], Some(credentials))?
            .json(payload);
        self.execute(request, "Failed to submit review.").await
    }

    /// Edit a review.
    ///
    /// # Errors
    ///
    /// Returns the API's message (or "Failed to update review.") on rejection.
    #[instrument(skip(self, credentials, payload), fields(review_id = %id))]
    pub async fn update_review(
        &self,
        credentials: &Credentials,
        id: &ReviewId,
        payload: &UpdateReview,
    ) -> Result<Review, ApiError> {
        let request = self
            .request(Method::PATCH, &["reviews", id.as_str()], Some(credentials))?
            .json(payload);
        self.execute(request, "Failed to update review.").await
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns the API's message (or "Failed to delete review.") on rejection.
    #[instrument(skip(self, credentials), fields(review_id = %id))]
    pub async fn delete_review(&self, credentials: &Credentials, id: &ReviewId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &["reviews", id.as_str()], Some(credentials))?;
        self.execute_unit(request, "Failed to delete review.").await
    }
}

fn summarize(reviews: &[Review]) -> MealReviewSummary {
    let total_reviews = u32::try_from(reviews.len()).unwrap_or(u32::MAX);
    let sum: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
    let average_rating = if total_reviews == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(total_reviews)
    };
    MealReviewSummary {
        average_rating,
        total_reviews,
    }
}
