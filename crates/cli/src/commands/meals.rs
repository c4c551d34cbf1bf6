//! Meal management commands (provider/admin).

use foodhub_core::MealId;
use foodhub_storefront::api::MealQuery;

use super::{CliError, Context, print_json};

/// List meals, optionally filtered by name.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn list(ctx: &Context, search: Option<String>) -> Result<(), CliError> {
    let query = MealQuery {
        search,
        ..MealQuery::default()
    };
    let page = ctx.api.list_meals(&query).await?;
    print_json(&page.items)
}

/// Mark a meal available or unavailable.
///
/// # Errors
///
/// Returns an error if the meal does not exist or the update is rejected.
pub async fn set_availability(ctx: &Context, id: &MealId, available: bool) -> Result<(), CliError> {
    let meal = ctx
        .api
        .set_meal_availability(&ctx.credentials, id, available)
        .await?;
    tracing::info!(meal_id = %id, available, "Meal availability updated");
    print_json(&meal)
}

/// Delete a meal.
///
/// # Errors
///
/// Returns an error if the API refuses the deletion.
pub async fn delete(ctx: &Context, id: &MealId) -> Result<(), CliError> {
    ctx.api.delete_meal(&ctx.credentials, id).await?;
    tracing::info!(meal_id = %id, "Meal deleted");
    print_json(&serde_json::json!({ "deleted": id }))
}
