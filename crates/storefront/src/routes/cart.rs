//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Adding a meal from a second
//! provider does not touch the cart; the add is parked in the session until
//! the visitor confirms or discards the switch.

use axum::{Json, extract::State};
use foodhub_core::MealId;
use foodhub_core::cart::{AddOutcome, Cart, CartMeal, CartProvider, PendingAdd};
use foodhub_core::checkout::OrderTotals;
use foodhub_core::models::Meal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiClient;
use crate::cart::{SessionCart, propose_replace, take_pending};
use crate::error::{AppError, Envelope, Result};
use crate::routes::checkout::TotalsView;
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub items: Vec<CartLineView>,
    pub total_items: u32,
    pub totals: TotalsView,
}

/// One cart line with its line total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub meal: CartMeal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            provider_id: cart.provider_id.as_ref().map(ToString::to_string),
            provider_name: cart.provider_name.clone(),
            items: cart
                .items
                .iter()
                .map(|item| CartLineView {
                    meal: item.meal.clone(),
                    quantity: item.quantity,
                    line_total: item.line_total(),
                })
                .collect(),
            total_items: cart.total_items(),
            totals: OrderTotals::for_cart(cart).into(),
        }
    }
}

/// Cart after a mutation, with an optional notice to display.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub notice: Option<String>,
    pub cart: CartView,
}

impl CartResponse {
    fn new(cart: &Cart, notice: Option<&str>) -> Self {
        Self {
            notice: notice.map(String::from),
            cart: CartView::from(cart),
        }
    }
}

/// Result of an add request.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AddResponse {
    Added {
        notice: String,
        quantity: u32,
        cart: CartView,
    },
    /// The cart holds another provider's meals; confirm or discard.
    Conflict { prompt: String, pending: PendingAdd },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealForm {
    pub meal_id: MealId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityForm {
    pub meal_id: MealId,
    pub quantity: i64,
}

/// Display the cart.
#[instrument(skip_all)]
pub async fn show(cart: SessionCart) -> Envelope<CartView> {
    Envelope::ok(CartView::from(cart.cart()))
}

/// Add one unit of a meal.
#[instrument(skip(state, session, cart))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    mut cart: SessionCart,
    Json(form): Json<MealForm>,
) -> Result<Envelope<AddResponse>> {
    let meal = state.api().get_meal_fresh(&form.meal_id).await?;
    if !meal.is_available {
        return Err(AppError::BadRequest(
            "This meal is currently unavailable.".to_string(),
        ));
    }
    let provider = cart_provider(state.api(), &meal).await?;

    let response = match cart.add(CartMeal::from(&meal), provider).await {
        AddOutcome::Added { notice, quantity } => AddResponse::Added {
            notice,
            quantity,
            cart: CartView::from(cart.cart()),
        },
        AddOutcome::ProviderConflict(pending) => {
            propose_replace(&session, &pending).await?;
            tracing::debug!(meal_id = %pending.meal.id, "Provider switch pending");
            AddResponse::Conflict {
                prompt: pending.prompt(),
                pending,
            }
        }
    };

    Ok(Envelope::ok(response))
}

/// Replace the cart with the pending meal.
#[instrument(skip_all)]
pub async fn confirm(session: Session, mut cart: SessionCart) -> Result<Envelope<CartResponse>> {
    let pending = take_pending(&session)
        .await?
        .ok_or_else(|| AppError::BadRequest("There is no pending cart change.".to_string()))?;

    let notice = format!("{} added to cart", pending.meal.name);
    cart.confirm_replace(pending).await;
    Ok(Envelope::ok(CartResponse::new(cart.cart(), Some(&notice))))
}

/// Drop the pending meal and keep the cart as it is.
#[instrument(skip_all)]
pub async fn discard(session: Session, cart: SessionCart) -> Result<Envelope<CartResponse>> {
    take_pending(&session).await?;
    Ok(Envelope::ok(CartResponse::new(cart.cart(), None)))
}

/// Set a line's quantity. Quantities below 1 leave the cart unchanged.
#[instrument(skip(cart))]
pub async fn update(
    mut cart: SessionCart,
    Json(form): Json<UpdateQuantityForm>,
) -> Envelope<CartResponse> {
    cart.update_quantity(&form.meal_id, form.quantity).await;
    Envelope::ok(CartResponse::new(cart.cart(), None))
}

/// Remove a line.
#[instrument(skip(cart))]
pub async fn remove(mut cart: SessionCart, Json(form): Json<MealForm>) -> Envelope<CartResponse> {
    let notice = cart
        .remove(&form.meal_id)
        .await
        .then_some("Item removed from cart");
    Envelope::ok(CartResponse::new(cart.cart(), notice))
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(mut cart: SessionCart) -> Envelope<CartResponse> {
    cart.clear().await;
    Envelope::ok(CartResponse::new(cart.cart(), Some("Cart cleared")))
}

/// The provider a meal is sold by, from the embedded profile or the API.
async fn cart_provider(api: &ApiClient, meal: &Meal) -> Result<CartProvider> {
    let name = match &meal.provider_profile {
        Some(profile) => profile.name.clone(),
        None => api.get_provider(&meal.provider_id).await?.name,
    };
    Ok(CartProvider {
        id: meal.provider_id.clone(),
        name,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use foodhub_core::ProviderId;

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::empty();
        let meal = CartMeal {
            id: MealId::new("m1"),
            provider_id: ProviderId::new("p1"),
            name: "Kacchi".to_string(),
            price: Decimal::new(250, 0),
            image: String::new(),
        };
        let provider = CartProvider {
            id: ProviderId::new("p1"),
            name: "Star Kabab".to_string(),
        };
        cart.add(meal, provider);

        let view = CartView::from(&cart);
        assert_eq!(view.total_items, 1);
        assert_eq!(view.provider_name.as_deref(), Some("Star Kabab"));
        assert_eq!(view.totals.amounts.total, Decimal::new(31250, 2));
        assert_eq!(view.totals.formatted_total, "৳312.50");
        assert_eq!(view.items.first().unwrap().line_total, Decimal::new(250, 0));
    }

    #[test]
    fn test_add_response_tags() {
        let json = serde_json::to_value(AddResponse::Added {
            notice: "Kacchi added to cart".to_string(),
            quantity: 1,
            cart: CartView::from(&Cart::empty()),
        })
        .unwrap();
        assert_eq!(json["status"], "added");
        assert_eq!(json["cart"]["totalItems"], 0);
        assert_eq!(json["cart"]["totals"]["total"], "0");
        assert_eq!(json["cart"]["totals"]["formattedTotal"], "৳0.00");
    }
}
