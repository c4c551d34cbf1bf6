//! HTTP route handlers for storefront.
//!
//! Every handler answers JSON in the `{ data, error }` envelope.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET  /meals                  - Meal listing (filters as query params)
//! GET  /meals/{id}             - Meal detail with rating summary
//! GET  /providers              - Provider listing
//! GET  /providers/{id}         - Provider detail with menu
//! GET  /categories             - Category listing
//!
//! # Search (debounced per visitor, 204 when superseded)
//! GET  /search/meals?q=
//! GET  /search/providers?q=
//!
//! # Cart (session)
//! GET  /cart                   - Cart with totals
//! POST /cart/add               - Add a meal, or park a provider switch
//! POST /cart/add/confirm       - Commit the parked provider switch
//! POST /cart/add/discard       - Drop the parked provider switch
//! POST /cart/update            - Set a line's quantity
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! GET  /checkout               - Price summary
//! POST /checkout               - Place the order
//!
//! # Orders (requires auth)
//! GET  /orders                 - Own orders
//! GET  /orders/{id}            - Order detail for the viewer's role
//! POST /orders/{id}/status     - Status transition
//! POST /orders/{id}/reviews    - Create or edit a review
//!
//! # Reviews (requires auth)
//! GET    /reviews              - Own reviews
//! DELETE /reviews/{id}         - Delete own review
//!
//! # Dashboard (requires auth)
//! GET  /dashboard              - Page for the viewer's role
//!
//! # Account (requires auth)
//! GET  /account                - Own account
//! POST /account/profile        - Update name, phone and picture
//! POST /become-partner         - Create a restaurant profile
//!
//! # Partner (providers only)
//! POST /partner/profile        - Update the restaurant profile
//! POST /partner/meals          - Add a meal
//! POST /partner/meals/{id}     - Edit a meal
//!
//! # Admin
//! GET  /admin/users/{id}       - One user's account
//! ```

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod orders;
pub mod partner;
pub mod reviews;
pub mod search;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(catalog::meals))
        .route("/meals/{id}", get(catalog::meal))
        .route("/providers", get(catalog::providers))
        .route("/providers/{id}", get(catalog::provider))
        .route("/categories", get(catalog::categories))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(search::meals))
        .route("/providers", get(search::providers))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/add/confirm", post(cart::confirm))
        .route("/add/discard", post(cart::discard))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
        .route("/{id}/reviews", post(reviews::submit))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::index))
        .route("/{id}", delete(reviews::delete))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show))
        .route("/profile", post(account::update_profile))
}

/// Create the partner routes router.
pub fn partner_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(partner::update_profile))
        .route("/meals", post(partner::create_meal))
        .route("/meals/{id}", post(partner::update_meal))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .nest("/search", search_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::summary).post(checkout::place))
        .nest("/orders", order_routes())
        .nest("/reviews", review_routes())
        .route("/dashboard", get(dashboard::show))
        .nest("/account", account_routes())
        .route("/become-partner", post(account::become_partner))
        .nest("/partner", partner_routes())
        .route("/admin/users/{id}", get(admin::user))
}
