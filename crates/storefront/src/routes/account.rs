//! Account route handlers (requires auth).

use axum::{Json, extract::State};
use foodhub_core::models::{Provider, ProviderProfileInput, User, UserProfileInput};
use tracing::instrument;

use crate::error::{Envelope, Result};
use crate::middleware::RequireAuth;
use crate::services::profiles;
use crate::state::AppState;

/// The signed-in user's account.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Envelope<User>> {
    let account = profiles::own_account(state.api(), &user).await?;
    Ok(Envelope::ok(account))
}

/// Update name, phone and picture.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<UserProfileInput>,
) -> Result<Envelope<User>> {
    let account = profiles::update_own_profile(state.api(), &user, &form).await?;
    Ok(Envelope::ok(account))
}

/// Submit a restaurant profile and become a partner.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn become_partner(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<ProviderProfileInput>,
) -> Result<Envelope<Provider>> {
    let provider = profiles::become_partner(state.api(), &user, &form).await?;
    Ok(Envelope::ok(provider))
}
