//! Meal endpoints.

use foodhub_core::models::{Meal, MealInput};
use foodhub_core::{CategoryId, MealId, ProviderId};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, ApiError, Credentials, Page};

/// Filters for the meal list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl MealQuery {
    /// Free-text search with no other filters.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// All meals of one provider.
    #[must_use]
    pub fn for_provider(provider_id: ProviderId) -> Self {
        Self {
            provider_id: Some(provider_id),
            ..Self::default()
        }
    }
}

impl ApiClient {
    /// List meals.
    ///
    /// Results are cached unless a search term is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_meals(&self, query: &MealQuery) -> Result<Page<Meal>, ApiError> {
        let cacheable = query.search.is_none();
        let key = CacheKey::Meals(serde_json::to_string(query)?);

        if cacheable && let Some(CacheValue::Meals(page)) = self.cached(&key).await {
            return Ok(page);
        }

        let request = self.request(Method::GET, &["meals"], None)?.query(query);
        let page: Page<Meal> = self.execute_list(request, "Failed to fetch meals.").await?;

        if cacheable {
            self.cache(key, CacheValue::Meals(page.clone())).await;
        }
        Ok(page)
    }

    /// Get one meal with its provider and category.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown IDs, or another error if the
    /// API request fails.
    #[instrument(skip(self), fields(meal_id = %id))]
    pub async fn get_meal(&self, id: &MealId) -> Result<Meal, ApiError> {
        let key = CacheKey::Meal(id.clone());
        if let Some(CacheValue::Meal(meal)) = self.cached(&key).await {
            return Ok(*meal);
        }

        let request = self.request(Method::GET, &["meals", id.as_str()], None)?;
        let meal: Meal = self.execute(request, "Failed to fetch meal.").await?;

        self.cache(key, CacheValue::Meal(Box::new(meal.clone()))).await;
        Ok(meal)
    }

    /// Get a meal without consulting the cache.
    ///
    /// Used where availability must be current, such as adding to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the meal does not exist or the request fails.
    #[instrument(skip(self), fields(meal_id = %id))]
    pub async fn get_meal_fresh(&self, id: &MealId) -> Result<Meal, ApiError> {
        let request = self.request(Method::GET, &["meals", id.as_str()], None)?;
        let meal: Meal = self.execute(request, "Failed to fetch meal.").await?;
        self.cache(CacheKey::Meal(id.clone()), CacheValue::Meal(Box::new(meal.clone())))
            .await;
        Ok(meal)
    }

    /// Create a meal (provider).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials, input), fields(name = %input.name))]
    pub async fn create_meal(
        &self,
        credentials: &Credentials,
        input: &MealInput,
    ) -> Result<Meal, ApiError> {
        let request = self
            .request(Method::POST, &["meals"], Some(credentials))?
            .json(input);
        let meal = self.execute(request, "Failed to create meal.").await?;
        self.invalidate(CacheKey::is_meal);
        Ok(meal)
    }

    /// Update a meal (provider).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials, input), fields(meal_id = %id))]
    pub async fn update_meal(
        &self,
        credentials: &Credentials,
        id: &MealId,
        input: &MealInput,
    ) -> Result<Meal, ApiError> {
        let request = self
            .request(Method::PATCH, &["meals", id.as_str()], Some(credentials))?
            .json(input);
        let meal = self.execute(request, "Failed to update meal.").await?;
        self.invalidate(CacheKey::is_meal);
        Ok(meal)
    }

    /// Toggle whether a meal can be ordered.
    ///
    /// # Errors
    ///
    /// Returns an error if the meal cannot be fetched or updated.
    #[instrument(skip(self, credentials), fields(meal_id = %id))]
    pub async fn set_meal_availability(
        &self,
        credentials: &Credentials,
        id: &MealId,
        available: bool,
    ) -> Result<Meal, ApiError> {
        let current = self.get_meal_fresh(id).await?;
        let mut input = MealInput::from(&current);
        input.is_available = available;
        self.update_meal(credentials, id, &input).await
    }

    /// Delete a meal (provider or admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials), fields(meal_id = %id))]
    pub async fn delete_meal(&self, credentials: &Credentials, id: &MealId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &["meals", id.as_str()], Some(credentials))?;
        self.execute_unit(request, "Failed to delete meal.").await?;
        self.invalidate(CacheKey::is_meal);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_serializes_only_set_filters() {
        let query = MealQuery {
            category_id: Some(CategoryId::new("c1")),
            is_featured: Some(true),
            ..MealQuery::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "categoryId": "c1", "isFeatured": true })
        );
    }
}
