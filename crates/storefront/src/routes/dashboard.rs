//! Dashboard route handler (requires auth).

use axum::extract::State;
use tracing::instrument;

use crate::dashboard::{self, DashboardPage};
use crate::error::{Envelope, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// The dashboard for the signed-in user's role.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Envelope<DashboardPage>> {
    let page = dashboard::dispatch(state.api(), &user).await?;
    Ok(Envelope::ok(page))
}
