//! Category endpoints.

use foodhub_core::CategoryId;
use foodhub_core::models::{Category, CategoryInput};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, ApiError, Credentials, Page};

/// Filters for the category list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl ApiClient {
    /// List categories.
    ///
    /// Results are cached unless a search term is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self, query: &CategoryQuery) -> Result<Page<Category>, ApiError> {
        let cacheable = query.search.is_none();
        let key = CacheKey::Categories(serde_json::to_string(query)?);

        if cacheable && let Some(CacheValue::Categories(page)) = self.cached(&key).await {
            return Ok(page);
        }

        let request = self.request(Method::GET, &["categories"], None)?.query(query);
        let page: Page<Category> = self
            .execute_list(request, "Failed to fetch categories.")
            .await?;

        if cacheable {
            self.cache(key, CacheValue::Categories(page.clone())).await;
        }
        Ok(page)
    }

    /// Get one category.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown IDs, or another error if the
    /// API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get_category(&self, id: &CategoryId) -> Result<Category, ApiError> {
        let key = CacheKey::Category(id.clone());
        if let Some(CacheValue::Category(category)) = self.cached(&key).await {
            return Ok(*category);
        }

        let request = self.request(Method::GET, &["categories", id.as_str()], None)?;
        let category: Category = self.execute(request, "Failed to fetch category.").await?;

        self.cache(key, CacheValue::Category(Box::new(category.clone())))
            .await;
        Ok(category)
    }

    /// Create a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials))]
    pub async fn create_category(
        &self,
        credentials: &Credentials,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let request = self
            .request(Method::POST, &["categories"], Some(credentials))?
            .json(input);
        let category = self
            .execute(request, "Failed to create category.")
            .await?;
        self.invalidate(CacheKey::is_category);
        Ok(category)
    }

    /// Update a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        credentials: &Credentials,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let request = self
            .request(Method::PATCH, &["categories", id.as_str()], Some(credentials))?
            .json(input);
        let category = self
            .execute(request, "Failed to update category.")
            .await?;
        // Meals embed their category.
        self.invalidate(|key| key.is_category() || key.is_meal());
        Ok(category)
    }

    /// Delete a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials), fields(category_id = %id))]
    pub async fn delete_category(
        &self,
        credentials: &Credentials,
        id: &CategoryId,
    ) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &["categories", id.as_str()], Some(credentials))?;
        self.execute_unit(request, "Failed to delete category.")
            .await?;
        self.invalidate(|key| key.is_category() || key.is_meal());
        Ok(())
    }
}
