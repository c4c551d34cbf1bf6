//! Records exchanged with the remote marketplace API.
//!
//! Field names follow the API's camelCase JSON. Optional associations
//! (`providerProfile`, `customer`, `reviews`, ...) are only present when the
//! API populates them for the endpoint being called.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    CategoryId, MealId, OrderId, OrderStatus, PaymentType, ProviderId, ReviewId, Role, UserId,
    UserStatus,
};

/// A meal category (e.g. "Burgers").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The signature dish advertised on a provider card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureDish {
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: Decimal,
}

/// A restaurant profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub delivery_time: String,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub signature_dish: Option<SignatureDish>,
}

/// A meal listed by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: MealId,
    pub provider_id: ProviderId,
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price; the API sends it as a decimal string.
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub provider_profile: Option<Provider>,
    #[serde(default)]
    pub category: Option<Category>,
}

const fn default_true() -> bool {
    true
}

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub image: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub provider_profile: Option<Provider>,
}

/// Minimal user details embedded in orders and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Minimal meal details embedded in order lines and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub id: MealId,
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// One line of a persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub meal_id: MealId,
    pub quantity: u32,
    /// Unit price at the time the order was placed.
    pub price: Decimal,
    #[serde(default)]
    pub meal: Option<MealSummary>,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: UserId,
    pub provider_id: ProviderId,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub address: String,
    #[serde(default)]
    pub payment_type: PaymentType,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer: Option<UserSummary>,
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Order {
    /// Whether the order contains a line for the given meal.
    #[must_use]
    pub fn contains_meal(&self, meal_id: &MealId) -> bool {
        self.order_items.iter().any(|item| &item.meal_id == meal_id)
    }

    /// The review already left for a meal of this order, if any.
    #[must_use]
    pub fn review_for(&self, meal_id: &MealId) -> Option<&Review> {
        self.reviews.iter().find(|review| &review.meal_id == meal_id)
    }
}

/// A customer review of one meal of a delivered order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub customer_id: UserId,
    pub meal_id: MealId,
    pub order_id: OrderId,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub customer: Option<UserSummary>,
    #[serde(default)]
    pub meal: Option<MealSummary>,
}

/// Aggregate rating of a meal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealReviewSummary {
    pub average_rating: f64,
    pub total_reviews: u32,
}

// =============================================================================
// Request Payloads
// =============================================================================

/// One line of an order-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub meal_id: MealId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Order-creation request built from a cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub customer_id: UserId,
    pub provider_id: ProviderId,
    pub order_items: Vec<CreateOrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub address: String,
    pub payment_type: PaymentType,
}

/// Body of an order status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}

/// Review-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub customer_id: UserId,
    pub meal_id: MealId,
    pub order_id: OrderId,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Review edit request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Category create/update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub emoji: String,
    pub image: String,
}

/// Meal create/update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealInput {
    pub provider_id: ProviderId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub is_available: bool,
    pub is_featured: bool,
}

impl From<&Meal> for MealInput {
    fn from(meal: &Meal) -> Self {
        Self {
            provider_id: meal.provider_id.clone(),
            category_id: meal.category_id.clone(),
            name: meal.name.clone(),
            description: meal.description.clone(),
            price: meal.price,
            image: meal.image.clone(),
            is_available: meal.is_available,
            is_featured: meal.is_featured,
        }
    }
}

/// Provider profile create ("become a partner") and update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfileInput {
    pub name: String,
    pub address: String,
    pub description: String,
    pub logo: String,
}

/// User profile update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileInput {
    pub name: String,
    pub phone: String,
    pub image: String,
}

/// Body of an admin account status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserStatus {
    pub status: UserStatus,
}
