//! Role-specific dashboards.
//!
//! `/dashboard` serves every role. [`dispatch`] picks the page for the
//! signed-in user's role and loads only what that page shows.

use foodhub_core::Role;
use foodhub_core::models::{Category, Meal, Order, Provider, Review, User};
use serde::Serialize;
use tracing::instrument;

use crate::api::{ApiClient, CategoryQuery, MealQuery, OrderQuery, Page, ReviewQuery};
use crate::error::AppError;
use crate::models::CurrentUser;

/// Data for one role's dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardPage {
    Customer {
        orders: Page<Order>,
        reviews: Page<Review>,
    },
    Provider {
        /// `None` until the provider completes the partner profile.
        profile: Option<Provider>,
        meals: Page<Meal>,
        orders: Page<Order>,
    },
    Admin {
        users: Page<User>,
        categories: Page<Category>,
    },
}

/// Load the dashboard for the signed-in user.
///
/// # Errors
///
/// Returns an error if any of the page's API requests fail.
#[instrument(skip_all, fields(user_id = %user.id, role = %user.role))]
pub async fn dispatch(api: &ApiClient, user: &CurrentUser) -> Result<DashboardPage, AppError> {
    match user.role {
        Role::Customer => customer(api, user).await,
        Role::Provider => provider(api, user).await,
        Role::Admin => admin(api, user).await,
    }
}

async fn customer(api: &ApiClient, user: &CurrentUser) -> Result<DashboardPage, AppError> {
    let orders = OrderQuery {
        customer_id: Some(user.id.clone()),
        sort_by: Some("createdAt".to_string()),
        sort_order: Some("desc".to_string()),
        ..OrderQuery::default()
    };
    let reviews = ReviewQuery {
        customer_id: Some(user.id.clone()),
        ..ReviewQuery::default()
    };

    let (orders, reviews) = tokio::try_join!(
        api.list_orders(&user.credentials, &orders),
        api.list_reviews(Some(&user.credentials), &reviews),
    )?;

    Ok(DashboardPage::Customer { orders, reviews })
}

async fn provider(api: &ApiClient, user: &CurrentUser) -> Result<DashboardPage, AppError> {
    let profile = api.current_user(&user.credentials).await?.provider_profile;

    let Some(provider) = &profile else {
        return Ok(DashboardPage::Provider {
            profile: None,
            meals: Page::unpaged(Vec::new()),
            orders: Page::unpaged(Vec::new()),
        });
    };

    let orders = OrderQuery {
        provider_id: Some(provider.id.clone()),
        sort_by: Some("createdAt".to_string()),
        sort_order: Some("desc".to_string()),
        ..OrderQuery::default()
    };
    let meals = MealQuery::for_provider(provider.id.clone());
    let (meals, orders) = tokio::try_join!(
        api.list_meals(&meals),
        api.list_orders(&user.credentials, &orders),
    )?;

    Ok(DashboardPage::Provider {
        profile,
        meals,
        orders,
    })
}

async fn admin(api: &ApiClient, user: &CurrentUser) -> Result<DashboardPage, AppError> {
    let categories = CategoryQuery::default();
    let (users, categories) = tokio::try_join!(
        api.list_users(&user.credentials),
        api.list_categories(&categories),
    )?;
    Ok(DashboardPage::Admin { users, categories })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_is_tagged_by_role() {
        let page = DashboardPage::Admin {
            users: Page::unpaged(Vec::new()),
            categories: Page::unpaged(Vec::new()),
        };
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["role"], "ADMIN");
        assert!(json["users"]["items"].as_array().unwrap().is_empty());
    }
}
