//! Session-related types.

use foodhub_core::{Role, UserId};

use crate::api::{Credentials, SessionUser};

/// The signed-in caller.
///
/// Resolved per request from the auth provider; never stored in the
/// storefront session. Carries the caller's cookie so downstream API calls
/// run with the caller's own permissions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub credentials: Credentials,
}

impl CurrentUser {
    /// Combine a resolved session with the cookie it was resolved from.
    #[must_use]
    pub fn new(user: SessionUser, credentials: Credentials) -> Self {
        Self {
            id: user.id,
            role: user.role,
            name: user.name,
            email: user.email,
            credentials,
        }
    }
}

/// Session keys for storefront state.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = "foodhub-cart";

    /// Key for an add waiting on a provider-switch confirmation.
    pub const PENDING_ADD: &str = "foodhub-cart-pending";

    /// Key identifying the visitor's search debouncers.
    pub const SEARCH: &str = "foodhub-search";
}
