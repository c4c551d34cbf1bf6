//! Cache types for catalog responses.

use foodhub_core::models::{Category, Meal, Provider};
use foodhub_core::{CategoryId, MealId, ProviderId};

use super::Page;

/// Cache key for catalog lookups.
///
/// List keys carry the full query string so different filters never share
/// an entry.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Category(CategoryId),
    Categories(String),
    Meal(MealId),
    Meals(String),
    Provider(ProviderId),
    Providers(String),
}

impl CacheKey {
    /// Whether this entry holds category data.
    pub const fn is_category(&self) -> bool {
        matches!(self, Self::Category(_) | Self::Categories(_))
    }

    /// Whether this entry holds meal data.
    pub const fn is_meal(&self) -> bool {
        matches!(self, Self::Meal(_) | Self::Meals(_))
    }

    /// Whether this entry holds provider data.
    pub const fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Providers(_))
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Category(Box<Category>),
    Categories(Page<Category>),
    Meal(Box<Meal>),
    Meals(Page<Meal>),
    Provider(Box<Provider>),
    Providers(Page<Provider>),
}
