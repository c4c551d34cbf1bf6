//! Provider profile endpoints.

use foodhub_core::ProviderId;
use foodhub_core::models::{Provider, ProviderProfileInput};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, ApiError, Credentials, Page};

#[derive(Serialize)]
struct SearchParams<'a> {
    search: &'a str,
}

impl ApiClient {
    /// List providers, optionally filtered by a search term.
    ///
    /// The unfiltered list is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_providers(&self, search: Option<&str>) -> Result<Page<Provider>, ApiError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let key = CacheKey::Providers(String::new());

        if search.is_none()
            && let Some(CacheValue::Providers(page)) = self.cached(&key).await
        {
            return Ok(page);
        }

        let mut request = self.request(Method::GET, &["provider-profiles"], None)?;
        if let Some(search) = search {
            request = request.query(&SearchParams { search });
        }
        let page: Page<Provider> = self
            .execute_list(request, "Failed to fetch providers.")
            .await?;

        if search.is_none() {
            self.cache(key, CacheValue::Providers(page.clone())).await;
        }
        Ok(page)
    }

    /// Get one provider profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown IDs, or another error if the
    /// API request fails.
    #[instrument(skip(self), fields(provider_id = %id))]
    pub async fn get_provider(&self, id: &ProviderId) -> Result<Provider, ApiError> {
        let key = CacheKey::Provider(id.clone());
        if let Some(CacheValue::Provider(provider)) = self.cached(&key).await {
            return Ok(*provider);
        }

        let request = self.request(Method::GET, &["provider-profiles", id.as_str()], None)?;
        let provider: Provider = self.execute(request, "Failed to fetch provider.").await?;

        self.cache(key, CacheValue::Provider(Box::new(provider.clone())))
            .await;
        Ok(provider)
    }

    /// Create the caller's provider profile ("become a partner").
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials, input), fields(name = %input.name))]
    pub async fn create_provider_profile(
        &self,
        credentials: &Credentials,
        input: &ProviderProfileInput,
    ) -> Result<Provider, ApiError> {
        let request = self
            .request(Method::POST, &["provider-profiles"], Some(credentials))?
            .json(input);
        let provider = self
            .execute(request, "Failed to create partner profile")
            .await?;
        self.invalidate(CacheKey::is_provider);
        Ok(provider)
    }

    /// Update a provider profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials, input), fields(provider_id = %id))]
    pub async fn update_provider_profile(
        &self,
        credentials: &Credentials,
        id: &ProviderId,
        input: &ProviderProfileInput,
    ) -> Result<Provider, ApiError> {
        let request = self
            .request(
                Method::PATCH,
                &["provider-profiles", id.as_str()],
                Some(credentials),
            )?
            .json(input);
        let provider = self
            .execute(request, "Failed to update provider profile.")
            .await?;
        // Meals embed their provider profile.
        self.invalidate(|key| key.is_provider() || key.is_meal());
        Ok(provider)
    }
}
