//! Admin route handlers.

use axum::extract::{Path, State};
use foodhub_core::UserId;
use foodhub_core::models::User;
use tracing::instrument;

use crate::error::{Envelope, Result};
use crate::middleware::RequireAuth;
use crate::services::profiles;
use crate::state::AppState;

/// One user's account.
#[instrument(skip_all, fields(user_id = %user.id, account_id = %id))]
pub async fn user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<Envelope<User>> {
    let account = profiles::user_account(state.api(), &user, &id).await?;
    Ok(Envelope::ok(account))
}
