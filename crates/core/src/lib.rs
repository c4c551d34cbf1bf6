//! FoodHub Core - Domain types and rules.
//!
//! This crate provides the types and pure business rules shared by the
//! FoodHub components:
//! - `storefront` - Server-rendered marketplace front-end
//! - `cli` - Command-line tools for catalog and account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Everything here can be exercised from a unit test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, roles and statuses
//! - [`models`] - Records exchanged with the remote marketplace API
//! - [`cart`] - Single-provider shopping cart state machine
//! - [`order`] - Forward-only order status machine with role gating
//! - [`checkout`] - Order pricing and submission validation
//! - [`review`] - Review gating and draft validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod models;
pub mod order;
pub mod review;
pub mod types;

pub use types::*;
