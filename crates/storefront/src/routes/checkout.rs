//! Checkout route handlers.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use foodhub_core::checkout::{CheckoutError, OrderTotals};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::SessionCart;
use crate::error::{AppError, Envelope, Result};
use crate::middleware::OptionalAuth;
use crate::middleware::auth::{LOGIN_PATH, wants_html};
use crate::services;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub address: String,
}

/// Order totals plus the grand total ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    #[serde(flatten)]
    pub amounts: OrderTotals,
    pub formatted_total: String,
}

impl From<OrderTotals> for TotalsView {
    fn from(amounts: OrderTotals) -> Self {
        Self {
            formatted_total: amounts.formatted_total(),
            amounts,
        }
    }
}

/// Price summary for the current cart.
#[instrument(skip_all)]
pub async fn summary(cart: SessionCart) -> Envelope<TotalsView> {
    Envelope::ok(OrderTotals::for_cart(cart.cart()).into())
}

/// Place the order.
///
/// Authentication is optional at the extractor so an empty cart is reported
/// before a missing sign-in. Browsers without a session go to the login page.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    headers: HeaderMap,
    mut cart: SessionCart,
    Json(form): Json<CheckoutForm>,
) -> Result<Response> {
    match services::place_order(state.api(), &mut cart, user.as_ref(), &form.address).await {
        Ok(order) => Ok(Envelope::ok(order).into_response()),
        Err(AppError::Checkout(CheckoutError::NotAuthenticated)) if wants_html(&headers) => {
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        Err(err) => Err(err),
    }
}
