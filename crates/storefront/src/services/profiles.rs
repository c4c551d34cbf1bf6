//! Account, partner profile and menu management.
//!
//! Customers become partners by submitting a restaurant profile. Providers
//! then keep that profile and their menu up to date. Every write is scoped to
//! the caller: a provider's profile and meals are looked up from their own
//! account, never taken from the request.

use foodhub_core::models::{Meal, MealInput, Provider, ProviderProfileInput, User, UserProfileInput};
use foodhub_core::{CategoryId, MealId, Role, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::{AppError, add_breadcrumb};
use crate::models::CurrentUser;

/// Meal fields a provider may set; the owning provider comes from the account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDraft {
    pub category_id: CategoryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
}

const fn available_by_default() -> bool {
    true
}

/// The signed-in user's full account record.
///
/// # Errors
///
/// Returns an error if the API refuses or cannot be reached.
pub async fn own_account(api: &ApiClient, user: &CurrentUser) -> Result<User, AppError> {
    Ok(api.current_user(&user.credentials).await?)
}

/// Update the signed-in user's name, phone and picture.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] for a blank name, or an API error.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_own_profile(
    api: &ApiClient,
    user: &CurrentUser,
    input: &UserProfileInput,
) -> Result<User, AppError> {
    let input = clean_user_profile(input)?;
    let updated = api
        .update_user_profile(&user.credentials, &user.id, &input)
        .await?;
    tracing::info!("Profile updated");
    Ok(updated)
}

/// Create the caller's restaurant profile.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] for admins, [`AppError::BadRequest`] when
/// the caller already has a profile or a required field is blank, or an API
/// error.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn become_partner(
    api: &ApiClient,
    user: &CurrentUser,
    input: &ProviderProfileInput,
) -> Result<Provider, AppError> {
    if user.role == Role::Admin {
        return Err(AppError::Forbidden(
            "Admin accounts cannot become partners.".to_string(),
        ));
    }
    let input = clean_provider_profile(input)?;

    if api
        .current_user(&user.credentials)
        .await?
        .provider_profile
        .is_some()
    {
        return Err(AppError::BadRequest(
            "You already have a partner profile.".to_string(),
        ));
    }

    let provider = api
        .create_provider_profile(&user.credentials, &input)
        .await?;

    tracing::info!(provider_id = %provider.id, "Partner profile created");
    add_breadcrumb(
        "partner",
        "Partner profile created",
        Some(&[("provider_id", provider.id.as_str())]),
    );
    Ok(provider)
}

/// Update the signed-in provider's restaurant profile.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] for non-providers, [`AppError::NotFound`]
/// when no profile exists yet, or an API error.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_partner_profile(
    api: &ApiClient,
    user: &CurrentUser,
    input: &ProviderProfileInput,
) -> Result<Provider, AppError> {
    let input = clean_provider_profile(input)?;
    let profile = own_restaurant(api, user).await?;

    let updated = api
        .update_provider_profile(&user.credentials, &profile.id, &input)
        .await?;
    tracing::info!(provider_id = %updated.id, "Partner profile updated");
    Ok(updated)
}

/// Add a meal to the signed-in provider's menu.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] for non-providers, [`AppError::BadRequest`]
/// for an invalid draft, or an API error.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_meal(
    api: &ApiClient,
    user: &CurrentUser,
    draft: MealDraft,
) -> Result<Meal, AppError> {
    let profile = own_restaurant(api, user).await?;
    let input = meal_input(&profile, draft)?;

    let meal = api.create_meal(&user.credentials, &input).await?;
    tracing::info!(meal_id = %meal.id, provider_id = %profile.id, "Meal created");
    Ok(meal)
}

/// Edit a meal on the signed-in provider's menu.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] when the meal belongs to another provider,
/// [`AppError::BadRequest`] for an invalid draft, or an API error.
#[instrument(skip_all, fields(user_id = %user.id, meal_id = %id))]
pub async fn update_meal(
    api: &ApiClient,
    user: &CurrentUser,
    id: &MealId,
    draft: MealDraft,
) -> Result<Meal, AppError> {
    let profile = own_restaurant(api, user).await?;
    let input = meal_input(&profile, draft)?;

    let current = api.get_meal_fresh(id).await?;
    if current.provider_id != profile.id {
        return Err(AppError::Forbidden(
            "You can only edit meals on your own menu.".to_string(),
        ));
    }

    let meal = api.update_meal(&user.credentials, id, &input).await?;
    tracing::info!("Meal updated");
    Ok(meal)
}

/// One account, for the admin console.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] for non-admins, or an API error.
#[instrument(skip_all, fields(user_id = %user.id, account_id = %id))]
pub async fn user_account(
    api: &ApiClient,
    user: &CurrentUser,
    id: &UserId,
) -> Result<User, AppError> {
    if user.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only admins can view other accounts.".to_string(),
        ));
    }
    Ok(api.get_user(&user.credentials, id).await?)
}

/// The caller's own restaurant profile.
async fn own_restaurant(api: &ApiClient, user: &CurrentUser) -> Result<Provider, AppError> {
    if user.role != Role::Provider {
        return Err(AppError::Forbidden(
            "Only partners can manage a restaurant.".to_string(),
        ));
    }
    api.current_user(&user.credentials)
        .await?
        .provider_profile
        .ok_or_else(|| AppError::NotFound("Create your partner profile first.".to_string()))
}

fn required(value: &str, message: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(value.to_string())
}

fn clean_user_profile(input: &UserProfileInput) -> Result<UserProfileInput, AppError> {
    Ok(UserProfileInput {
        name: required(&input.name, "Please enter your name.")?,
        phone: input.phone.trim().to_string(),
        image: input.image.trim().to_string(),
    })
}

fn clean_provider_profile(input: &ProviderProfileInput) -> Result<ProviderProfileInput, AppError> {
    Ok(ProviderProfileInput {
        name: required(&input.name, "Please enter your restaurant's name.")?,
        address: required(&input.address, "Please enter your restaurant's address.")?,
        description: input.description.trim().to_string(),
        logo: input.logo.trim().to_string(),
    })
}

fn meal_input(profile: &Provider, draft: MealDraft) -> Result<MealInput, AppError> {
    let name = required(&draft.name, "Please enter a meal name.")?;
    if draft.price <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Price must be greater than zero.".to_string(),
        ));
    }
    Ok(MealInput {
        provider_id: profile.id.clone(),
        category_id: draft.category_id,
        name,
        description: draft.description.trim().to_string(),
        price: draft.price,
        image: draft.image.trim().to_string(),
        is_available: draft.is_available,
        is_featured: draft.is_featured,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use foodhub_core::ProviderId;

    fn restaurant() -> Provider {
        serde_json::from_value(serde_json::json!({ "id": "p1", "name": "Star Kabab" })).unwrap()
    }

    fn draft(name: &str, price: Decimal) -> MealDraft {
        MealDraft {
            category_id: CategoryId::new("c1"),
            name: name.to_string(),
            description: String::new(),
            price,
            image: String::new(),
            is_available: true,
            is_featured: false,
        }
    }

    #[test]
    fn test_meal_input_belongs_to_own_restaurant() {
        let input = meal_input(&restaurant(), draft("  Kacchi  ", Decimal::new(250, 0))).unwrap();

        assert_eq!(input.provider_id, ProviderId::new("p1"));
        assert_eq!(input.name, "Kacchi");
        assert!(input.is_available);
    }

    #[test]
    fn test_meal_input_rejects_bad_drafts() {
        assert!(matches!(
            meal_input(&restaurant(), draft(" ", Decimal::new(250, 0))),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            meal_input(&restaurant(), draft("Kacchi", Decimal::ZERO)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_draft_defaults() {
        let draft: MealDraft = serde_json::from_value(serde_json::json!({
            "categoryId": "c1",
            "name": "Tehari",
            "price": "180.00"
        }))
        .unwrap();

        assert!(draft.is_available);
        assert!(!draft.is_featured);
        assert_eq!(draft.price, Decimal::new(18000, 2));
    }

    #[test]
    fn test_provider_profile_requires_name_and_address() {
        let input = ProviderProfileInput {
            name: "Star Kabab".to_string(),
            address: "  ".to_string(),
            description: String::new(),
            logo: String::new(),
        };
        let err = clean_provider_profile(&input).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Please enter your restaurant's address.");
    }

    #[test]
    fn test_user_profile_is_trimmed() {
        let input = clean_user_profile(&UserProfileInput {
            name: " Karim ".to_string(),
            phone: " 01700000000 ".to_string(),
            image: String::new(),
        })
        .unwrap();
        assert_eq!(input.name, "Karim");
        assert_eq!(input.phone, "01700000000");
    }
}
