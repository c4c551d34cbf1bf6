//! Checkout pricing and order submission validation.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::cart::Cart;
use crate::models::{CreateOrder, CreateOrderItem};
use crate::types::price::round_money;
use crate::types::{PaymentType, Price, UserId};

/// Tax applied to the subtotal (5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Flat delivery charge per order (BDT 50).
pub const DELIVERY_CHARGE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Price breakdown shown at checkout and sent as the order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_charge: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Totals of an empty cart; no delivery is charged.
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        tax: Decimal::ZERO,
        delivery_charge: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    /// Compute tax, delivery and the rounded grand total for a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal: round_money(subtotal),
            tax: round_money(tax),
            delivery_charge: DELIVERY_CHARGE,
            total: round_money(subtotal + tax + DELIVERY_CHARGE),
        }
    }

    /// Totals for the current cart contents.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        if cart.is_empty() {
            return Self::ZERO;
        }
        Self::from_subtotal(cart.total_price())
    }

    /// Grand total as shown to the customer, e.g. `৳312.50`.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        Price::bdt(self.total).to_string()
    }
}

/// Reasons an order is rejected before contacting the server.
///
/// Checked in declaration order; the first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty.")]
    EmptyCart,

    #[error("Please log in to place an order.")]
    NotAuthenticated,

    #[error("Please provide a delivery address.")]
    MissingAddress,

    #[error("Cart is missing provider information.")]
    MissingProvider,
}

/// Validate a cart for submission and build the order-creation payload.
///
/// # Errors
///
/// Returns the first failing [`CheckoutError`] check.
pub fn prepare_order(
    cart: &Cart,
    customer: Option<&UserId>,
    address: &str,
) -> Result<CreateOrder, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let customer_id = customer.ok_or(CheckoutError::NotAuthenticated)?;
    let address = address.trim();
    if address.is_empty() {
        return Err(CheckoutError::MissingAddress);
    }
    let provider_id = cart
        .provider_id
        .clone()
        .ok_or(CheckoutError::MissingProvider)?;

    let order_items = cart
        .items
        .iter()
        .map(|item| CreateOrderItem {
            meal_id: item.meal.id.clone(),
            quantity: item.quantity,
            price: item.meal.price,
        })
        .collect();

    Ok(CreateOrder {
        customer_id: customer_id.clone(),
        provider_id,
        order_items,
        total_amount: OrderTotals::for_cart(cart).total,
        address: address.to_string(),
        payment_type: PaymentType::CashOnDelivery,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::{CartMeal, CartProvider};
    use crate::types::{MealId, ProviderId};

    fn cart_with_x() -> Cart {
        let provider = CartProvider {
            id: ProviderId::new("x"),
            name: "Provider X".to_string(),
        };
        let meal_a = CartMeal {
            id: MealId::new("a"),
            provider_id: ProviderId::new("x"),
            name: "Meal A".to_string(),
            price: Decimal::new(100, 0),
            image: String::new(),
        };
        let meal_b = CartMeal {
            id: MealId::new("b"),
            provider_id: ProviderId::new("x"),
            name: "Meal B".to_string(),
            price: Decimal::new(50, 0),
            image: String::new(),
        };

        let mut cart = Cart::empty();
        cart.add(meal_a.clone(), provider.clone());
        cart.add(meal_a, provider.clone());
        cart.add(meal_b, provider);
        cart
    }

    #[test]
    fn test_totals_for_reference_cart() {
        let totals = OrderTotals::for_cart(&cart_with_x());

        assert_eq!(totals.subtotal, Decimal::new(250, 0));
        assert_eq!(totals.tax, Decimal::new(1250, 2));
        assert_eq!(totals.delivery_charge, Decimal::new(50, 0));
        assert_eq!(totals.total, Decimal::new(31250, 2));
    }

    #[test]
    fn test_empty_cart_costs_nothing() {
        let totals = OrderTotals::for_cart(&Cart::empty());

        assert_eq!(totals, OrderTotals::ZERO);
        assert_eq!(totals.formatted_total(), "৳0.00");
    }

    #[test]
    fn test_formatted_total() {
        assert_eq!(OrderTotals::for_cart(&cart_with_x()).formatted_total(), "৳312.50");
    }

    #[test]
    fn test_total_rounds_to_two_decimals() {
        let totals = OrderTotals::from_subtotal(Decimal::new(3333, 2));
        // 33.33 + 1.6665 + 50 = 84.9965
        assert_eq!(totals.total, Decimal::new(8500, 2));
        assert_eq!(totals.tax, Decimal::new(167, 2));
    }

    #[test]
    fn test_prepare_order_builds_payload() {
        let cart = cart_with_x();
        let customer = UserId::new("u1");

        let payload = prepare_order(&cart, Some(&customer), "  House 4, Road 7  ").unwrap();

        assert_eq!(payload.customer_id, customer);
        assert_eq!(payload.provider_id, ProviderId::new("x"));
        assert_eq!(payload.address, "House 4, Road 7");
        assert_eq!(payload.order_items.len(), 2);
        assert_eq!(payload.total_amount, Decimal::new(31250, 2));
        assert_eq!(payload.payment_type, PaymentType::CashOnDelivery);
    }

    #[test]
    fn test_prepare_order_check_order() {
        let customer = UserId::new("u1");

        assert_eq!(
            prepare_order(&Cart::empty(), None, ""),
            Err(CheckoutError::EmptyCart)
        );
        assert_eq!(
            prepare_order(&cart_with_x(), None, ""),
            Err(CheckoutError::NotAuthenticated)
        );
        assert_eq!(
            prepare_order(&cart_with_x(), Some(&customer), "   "),
            Err(CheckoutError::MissingAddress)
        );

        let mut orphaned = cart_with_x();
        orphaned.provider_id = None;
        assert_eq!(
            prepare_order(&orphaned, Some(&customer), "Dhaka"),
            Err(CheckoutError::MissingProvider)
        );
    }
}
