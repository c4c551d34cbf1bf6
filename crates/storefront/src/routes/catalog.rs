//! Public catalog route handlers.
//!
//! Thin pass-throughs to the marketplace API. Responses come from the
//! catalog cache when possible.

use axum::extract::{Path, Query, State};
use foodhub_core::models::{Category, Meal, MealReviewSummary, Provider};
use foodhub_core::{MealId, ProviderId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::{CategoryQuery, MealQuery, Page};
use crate::error::{Envelope, Result};
use crate::state::AppState;

/// A meal with its rating summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetail {
    #[serde(flatten)]
    pub meal: Meal,
    pub reviews: MealReviewSummary,
}

/// A provider with the meals it sells.
#[derive(Debug, Serialize)]
pub struct ProviderDetail {
    #[serde(flatten)]
    pub provider: Provider,
    pub meals: Page<Meal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderParams {
    pub search: Option<String>,
}

/// List meals.
#[instrument(skip(state))]
pub async fn meals(
    State(state): State<AppState>,
    Query(query): Query<MealQuery>,
) -> Result<Envelope<Page<Meal>>> {
    Ok(Envelope::ok(state.api().list_meals(&query).await?))
}

/// One meal with its rating summary.
#[instrument(skip(state))]
pub async fn meal(
    State(state): State<AppState>,
    Path(id): Path<MealId>,
) -> Result<Envelope<MealDetail>> {
    let (meal, reviews) = tokio::try_join!(
        state.api().get_meal(&id),
        state.api().meal_review_summary(&id),
    )?;
    Ok(Envelope::ok(MealDetail { meal, reviews }))
}

/// List providers.
#[instrument(skip(state))]
pub async fn providers(
    State(state): State<AppState>,
    Query(params): Query<ProviderParams>,
) -> Result<Envelope<Page<Provider>>> {
    let providers = state.api().list_providers(params.search.as_deref()).await?;
    Ok(Envelope::ok(providers))
}

/// One provider and its menu.
#[instrument(skip(state))]
pub async fn provider(
    State(state): State<AppState>,
    Path(id): Path<ProviderId>,
) -> Result<Envelope<ProviderDetail>> {
    let menu = MealQuery::for_provider(id.clone());
    let (provider, meals) = tokio::try_join!(
        state.api().get_provider(&id),
        state.api().list_meals(&menu),
    )?;
    Ok(Envelope::ok(ProviderDetail { provider, meals }))
}

/// List categories.
#[instrument(skip(state))]
pub async fn categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Envelope<Page<Category>>> {
    Ok(Envelope::ok(state.api().list_categories(&query).await?))
}
