//! Persistent cart store.
//!
//! [`CartStore`] owns one [`Cart`] and keeps it in sync with a storage slot:
//!
//! 1. A new store starts empty and unhydrated.
//! 2. [`CartStore::hydrate`] loads the stored cart. Unparseable or
//!    inconsistent data is deleted and the store starts over empty.
//! 3. After hydration every mutation is written back. Before it, nothing is
//!    written, so the empty initial value can never clobber a stored cart.
//!
//! Storage failures are logged and otherwise ignored: persistence is best
//! effort and no cart operation fails because of it.
//!
//! In the storefront the slot lives in the visitor's session; handlers take a
//! [`SessionCart`] extractor which arrives already hydrated.

pub mod storage;

pub use storage::{CartStorage, MemoryStorage, SessionCartStorage, StorageError};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use foodhub_core::MealId;
use foodhub_core::cart::{AddOutcome, Cart, CartMeal, CartProvider, PendingAdd};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::keys;

/// A cart store backed by the visitor's session.
pub type SessionCart = CartStore<SessionCartStorage>;

/// Owner of the active cart and its persisted copy.
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
    hydrated: bool,
}

impl<S: CartStorage> CartStore<S> {
    /// Create an empty, unhydrated store.
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            cart: Cart::empty(),
            hydrated: false,
        }
    }

    /// Create a store and hydrate it from storage.
    pub async fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.hydrate().await;
        store
    }

    /// Load the stored cart, replacing the in-memory one.
    pub async fn hydrate(&mut self) {
        self.cart = match self.storage.read().await {
            Ok(Some(raw)) => match parse_stored(&raw) {
                Some(cart) => cart,
                None => {
                    tracing::warn!("Discarding corrupted stored cart");
                    if let Err(e) = self.storage.remove().await {
                        tracing::warn!(error = %e, "Failed to remove corrupted cart");
                    }
                    Cart::empty()
                }
            },
            Ok(None) => Cart::empty(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart");
                Cart::empty()
            }
        };
        self.hydrated = true;
    }

    /// Whether [`Self::hydrate`] has run.
    pub const fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// The current cart.
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add one unit of a meal.
    ///
    /// A provider conflict leaves the cart (and storage) untouched and hands
    /// back the pending add for the caller to confirm or drop.
    pub async fn add(&mut self, meal: CartMeal, provider: CartProvider) -> AddOutcome {
        let outcome = self.cart.add(meal, provider);
        if matches!(outcome, AddOutcome::Added { .. }) {
            self.persist().await;
        }
        outcome
    }

    /// Replace the cart with the single pending meal.
    pub async fn confirm_replace(&mut self, pending: PendingAdd) {
        self.cart.commit_replace(pending);
        self.persist().await;
    }

    /// Remove a meal's line. Returns `true` if a line was removed.
    pub async fn remove(&mut self, meal_id: &MealId) -> bool {
        let removed = self.cart.remove(meal_id);
        self.persist().await;
        removed
    }

    /// Set a meal's quantity; values below 1 are ignored.
    pub async fn update_quantity(&mut self, meal_id: &MealId, quantity: i64) -> bool {
        let changed = self.cart.update_quantity(meal_id, quantity);
        if changed {
            self.persist().await;
        }
        changed
    }

    /// Empty the cart.
    pub async fn clear(&mut self) {
        self.cart.clear();
        self.persist().await;
    }

    async fn persist(&self) {
        if !self.hydrated {
            return;
        }

        let raw = match serde_json::to_string(&self.cart) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.write(raw).await {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

/// Parse a stored cart, rejecting data that breaks the cart invariants.
fn parse_stored(raw: &str) -> Option<Cart> {
    serde_json::from_str::<Cart>(raw)
        .ok()
        .filter(Cart::is_consistent)
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Ok(Self::open(SessionCartStorage::new(session, keys::CART)).await)
    }
}

// =============================================================================
// Pending Provider Switch
// =============================================================================

/// Remember an add that is waiting for a provider-switch confirmation.
///
/// A newer conflict replaces an older one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn propose_replace(
    session: &Session,
    pending: &PendingAdd,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::PENDING_ADD, pending).await
}

/// Take the pending add out of the session, if there is one.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn take_pending(
    session: &Session,
) -> Result<Option<PendingAdd>, tower_sessions::session::Error> {
    session.remove::<PendingAdd>(keys::PENDING_ADD).await
}
