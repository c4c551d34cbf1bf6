//! User account commands (admin).

use foodhub_core::{UserId, UserStatus};

use super::{CliError, Context, print_json};

/// List all users.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let page = ctx.api.list_users(&ctx.credentials).await?;
    print_json(&page.items)
}

/// Activate or suspend a user.
///
/// # Errors
///
/// Returns an error if the API rejects the change.
pub async fn set_status(ctx: &Context, id: &UserId, status: UserStatus) -> Result<(), CliError> {
    let user = ctx
        .api
        .update_user_status(&ctx.credentials, id, status)
        .await?;
    tracing::info!(user_id = %id, %status, "User status updated");
    print_json(&user)
}
