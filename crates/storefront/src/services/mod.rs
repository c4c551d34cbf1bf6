//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - Turn the cart into an order
//! - `orders` - Order detail views and status transitions
//! - `profiles` - Account, partner profile and menu management
//! - `reviews` - Review submission gated on delivery
//!
//! Each service checks the rules it can check locally before calling the
//! marketplace API, which stays the final authority.

pub mod checkout;
pub mod orders;
pub mod profiles;
pub mod reviews;

pub use checkout::place_order;
pub use orders::{OrderView, order_detail, update_order_status};
pub use reviews::{ReviewOutcome, submit_review};
