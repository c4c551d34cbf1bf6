//! Single-provider shopping cart.
//!
//! The cart is a plain value: every mutation is a total function over the
//! current state and nothing here performs I/O. Persistence lives in the
//! storefront's cart store, which wraps this type.
//!
//! # Invariants
//!
//! - A non-empty cart holds meals from exactly one provider, recorded in
//!   `provider_id`/`provider_name`.
//! - An empty cart has no provider.
//! - Every line has a quantity of at least 1.
//!
//! # Provider conflicts
//!
//! Adding a meal from a different provider never mutates the cart. Instead
//! [`Cart::add`] returns [`AddOutcome::ProviderConflict`] with a
//! [`PendingAdd`]; the caller either commits it with
//! [`Cart::commit_replace`] (replacing the whole cart) or simply drops it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Meal;
use crate::types::{MealId, ProviderId};

/// Snapshot of the meal fields the cart needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMeal {
    pub id: MealId,
    pub provider_id: ProviderId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
}

impl From<&Meal> for CartMeal {
    fn from(meal: &Meal) -> Self {
        Self {
            id: meal.id.clone(),
            provider_id: meal.provider_id.clone(),
            name: meal.name.clone(),
            price: meal.price,
            image: meal.image.clone(),
        }
    }
}

/// The provider a meal is being added from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProvider {
    pub id: ProviderId,
    pub name: String,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub meal: CartMeal,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.meal.price * Decimal::from(self.quantity)
    }
}

/// Client-held collection of meal selections pending checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub provider_id: Option<ProviderId>,
    pub provider_name: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// An add that is waiting for the user to confirm a provider switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAdd {
    pub meal: CartMeal,
    pub provider: CartProvider,
    /// Name of the provider whose items would be discarded.
    pub current_provider_name: Option<String>,
}

impl PendingAdd {
    /// Confirmation prompt shown before replacing the cart.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Your cart has items from \"{}\". Adding this item will clear your current cart. Continue?",
            self.current_provider_name.as_deref().unwrap_or("another restaurant")
        )
    }
}

/// Result of [`Cart::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The meal was added or its quantity incremented.
    Added {
        /// Success notification for the caller to display.
        notice: String,
        /// Quantity of the meal now in the cart.
        quantity: u32,
    },
    /// The cart belongs to another provider and was left untouched.
    ProviderConflict(PendingAdd),
}

impl Cart {
    /// The empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            provider_id: None,
            provider_name: None,
            items: Vec::new(),
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of a meal.
    ///
    /// Increments the quantity if the meal is already present, otherwise
    /// appends a new line with quantity 1. Returns a provider conflict instead
    /// of mutating when the cart holds items from a different provider.
    pub fn add(&mut self, meal: CartMeal, provider: CartProvider) -> AddOutcome {
        if let Some(current) = &self.provider_id
            && !self.items.is_empty()
            && current != &provider.id
        {
            return AddOutcome::ProviderConflict(PendingAdd {
                meal,
                provider,
                current_provider_name: self.provider_name.clone(),
            });
        }

        let notice = format!("{} added to cart", meal.name);
        let quantity = match self.items.iter_mut().find(|item| item.meal.id == meal.id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                item.quantity
            }
            None => {
                self.items.push(CartItem { meal, quantity: 1 });
                1
            }
        };

        self.provider_id = Some(provider.id);
        self.provider_name = Some(provider.name);

        AddOutcome::Added { notice, quantity }
    }

    /// Replace the whole cart with the single pending meal.
    pub fn commit_replace(&mut self, pending: PendingAdd) {
        *self = Self {
            provider_id: Some(pending.provider.id),
            provider_name: Some(pending.provider.name),
            items: vec![CartItem {
                meal: pending.meal,
                quantity: 1,
            }],
        };
    }

    /// Remove a meal's line. Returns `true` if a line was removed.
    ///
    /// Removing the last line resets the provider.
    pub fn remove(&mut self, meal_id: &MealId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.meal.id != meal_id);
        let removed = self.items.len() != before;

        if self.items.is_empty() {
            self.clear();
        }

        removed
    }

    /// Set a meal's quantity. Returns `true` if a line changed.
    ///
    /// Quantities below 1 are ignored; dropping a line goes through
    /// [`Cart::remove`].
    pub fn update_quantity(&mut self, meal_id: &MealId, quantity: i64) -> bool {
        let Ok(quantity) = u32::try_from(quantity) else {
            return false;
        };
        if quantity < 1 {
            return false;
        }

        match self.items.iter_mut().find(|item| &item.meal.id == meal_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Reset to the empty cart.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Check the cart invariants.
    ///
    /// Used when restoring a cart from storage: a cart that fails this check
    /// is treated the same as unparseable data.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.items.is_empty() {
            return self.provider_id.is_none() && self.provider_name.is_none();
        }

        let Some(provider_id) = &self.provider_id else {
            return false;
        };

        let mut seen = std::collections::HashSet::new();
        self.items.iter().all(|item| {
            item.quantity >= 1
                && &item.meal.provider_id == provider_id
                && seen.insert(item.meal.id.clone())
        })
    }
}
