//! Order endpoints. Never cached: orders change underneath us.

use foodhub_core::models::{CreateOrder, Order, UpdateOrderStatus};
use foodhub_core::{OrderId, OrderStatus, ProviderId, UserId};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError, Credentials, Page};

/// Filters for the order list.
///
/// The API scopes results to the caller; these narrow them further.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl ApiClient {
    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns the API's message (or "Failed to place order.") when the order
    /// is rejected, or a transport error.
    #[instrument(skip(self, credentials, payload), fields(provider_id = %payload.provider_id))]
    pub async fn create_order(
        &self,
        credentials: &Credentials,
        payload: &CreateOrder,
    ) -> Result<Order, ApiError> {
        let request = self
            .request(Method::POST, &["orders"], Some(credentials))?
            .json(payload);
        self.execute(request, "Failed to place order.").await
    }

    /// List the caller's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, credentials))]
    pub async fn list_orders(
        &self,
        credentials: &Credentials,
        query: &OrderQuery,
    ) -> Result<Page<Order>, ApiError> {
        let request = self
            .request(Method::GET, &["orders"], Some(credentials))?
            .query(query);
        self.execute_list(request, "Failed to fetch orders.").await
    }

    /// Get one order with its items and reviews.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown IDs, or another error if the
    /// API request fails.
    #[instrument(skip(self, credentials), fields(order_id = %id))]
    pub async fn get_order(&self, credentials: &Credentials, id: &OrderId) -> Result<Order, ApiError> {
        let request = self.request(Method::GET, &["orders", id.as_str()], Some(credentials))?;
        self.execute(request, "Failed to fetch order.").await
    }

    /// Move an order to a new status.
    ///
    /// The API is the final authority; callers check the transition locally
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the transition or the request fails.
    #[instrument(skip(self, credentials), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        credentials: &Credentials,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let request = self
            .request(
                Method::PATCH,
                &["orders", id.as_str(), "status"],
                Some(credentials),
            )?
            .json(&UpdateOrderStatus { status });
        self.execute(request, "Failed to update order status.")
            .await
    }
}
