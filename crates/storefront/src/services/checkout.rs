//! Order placement.

use foodhub_core::checkout::{CheckoutError, prepare_order};
use foodhub_core::models::Order;
use tracing::instrument;

use crate::api::ApiClient;
use crate::cart::{CartStorage, CartStore};
use crate::error::{AppError, add_breadcrumb};
use crate::models::CurrentUser;

/// Validate the cart, place the order, and clear the cart on success.
///
/// Validation failures never reach the API. If the API rejects the order the
/// cart is left exactly as it was.
///
/// # Errors
///
/// Returns [`AppError::Checkout`] for local validation failures and
/// [`AppError::Api`] when the API rejects the order or cannot be reached.
#[instrument(skip_all, fields(user_id = user.map(|u| u.id.as_str())))]
pub async fn place_order<S: CartStorage>(
    api: &ApiClient,
    cart: &mut CartStore<S>,
    user: Option<&CurrentUser>,
    address: &str,
) -> Result<Order, AppError> {
    let payload = prepare_order(cart.cart(), user.map(|u| &u.id), address)?;
    let user = user.ok_or(CheckoutError::NotAuthenticated)?;

    let order = api.create_order(&user.credentials, &payload).await?;

    tracing::info!(
        order_id = %order.id,
        total = %payload.total_amount,
        "Order placed"
    );
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order.id.as_str())]));

    cart.clear().await;
    Ok(order)
}
