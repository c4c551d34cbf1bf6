//! Category management commands (admin).
//!
//! # Usage
//!
//! ```bash
//! fh-cli categories list --search burger
//! fh-cli categories create --name Burgers --emoji 🍔 --image https://cdn.example/burgers.png
//! fh-cli categories update <id> --name "Smash Burgers"
//! fh-cli categories delete <id>
//! ```

use foodhub_core::CategoryId;
use foodhub_core::models::CategoryInput;
use foodhub_storefront::api::CategoryQuery;

use super::{CliError, Context, print_json};

/// List categories, optionally filtered by name.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn list(ctx: &Context, search: Option<String>) -> Result<(), CliError> {
    let query = CategoryQuery {
        search,
        ..CategoryQuery::default()
    };
    let page = ctx.api.list_categories(&query).await?;
    print_json(&page.items)
}

/// Create a category.
///
/// # Errors
///
/// Returns an error if the API rejects the category.
pub async fn create(ctx: &Context, input: CategoryInput) -> Result<(), CliError> {
    let category = ctx.api.create_category(&ctx.credentials, &input).await?;
    tracing::info!(category_id = %category.id, "Category created");
    print_json(&category)
}

/// Update a category. Fields left out keep their current value.
///
/// # Errors
///
/// Returns an error if the category does not exist or the API rejects the
/// update.
pub async fn update(
    ctx: &Context,
    id: &CategoryId,
    name: Option<String>,
    emoji: Option<String>,
    image: Option<String>,
) -> Result<(), CliError> {
    let current = ctx.api.get_category(id).await?;
    let input = CategoryInput {
        name: name.unwrap_or(current.name),
        emoji: emoji.unwrap_or(current.emoji),
        image: image.unwrap_or(current.image),
    };
    let category = ctx.api.update_category(&ctx.credentials, id, &input).await?;
    print_json(&category)
}

/// Delete a category.
///
/// # Errors
///
/// Returns an error if the API refuses the deletion.
pub async fn delete(ctx: &Context, id: &CategoryId) -> Result<(), CliError> {
    ctx.api.delete_category(&ctx.credentials, id).await?;
    tracing::info!(category_id = %id, "Category deleted");
    print_json(&serde_json::json!({ "deleted": id }))
}
