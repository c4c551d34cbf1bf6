//! Partner route handlers: the provider's restaurant profile and menu.

use axum::{
    Json,
    extract::{Path, State},
};
use foodhub_core::MealId;
use foodhub_core::models::{Meal, Provider, ProviderProfileInput};
use tracing::instrument;

use crate::error::{Envelope, Result};
use crate::middleware::RequireAuth;
use crate::services::profiles::{self, MealDraft};
use crate::state::AppState;

/// Update the restaurant profile.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<ProviderProfileInput>,
) -> Result<Envelope<Provider>> {
    let provider = profiles::update_partner_profile(state.api(), &user, &form).await?;
    Ok(Envelope::ok(provider))
}

/// Add a meal to the menu.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(draft): Json<MealDraft>,
) -> Result<Envelope<Meal>> {
    let meal = profiles::create_meal(state.api(), &user, draft).await?;
    Ok(Envelope::ok(meal))
}

/// Edit a meal on the menu.
#[instrument(skip_all, fields(user_id = %user.id, meal_id = %id))]
pub async fn update_meal(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<MealId>,
    Json(draft): Json<MealDraft>,
) -> Result<Envelope<Meal>> {
    let meal = profiles::update_meal(state.api(), &user, &id, draft).await?;
    Ok(Envelope::ok(meal))
}
