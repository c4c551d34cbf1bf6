//! Client for the FoodHub marketplace REST API.
//!
//! # Architecture
//!
//! - JSON over HTTP via `reqwest`, one shared connection pool
//! - The caller's cookie is forwarded on every request ([`Credentials`]);
//!   the remote API and the auth provider decide what the caller may do
//! - Public catalog data (categories, meals, providers) is cached in `moka`
//!   and invalidated by the mutations that change it
//! - Every request carries a timeout, so a stalled backend surfaces as
//!   [`ApiError::Timeout`] instead of hanging the handler
//!
//! # Response bodies
//!
//! Successful responses wrap their payload as `{ "data": ... }`. List
//! endpoints return either a plain array or a paginated
//! `{ "data": [...], "meta": {...} }` object inside that wrapper; both
//! decode into [`Page`]. Failures carry `{ "message": "..." }`, and each
//! operation supplies the message used when the body has none.

mod auth;
mod cache;
mod categories;
mod meals;
mod orders;
mod providers;
mod reviews;
mod users;

pub use auth::SessionUser;
pub use categories::CategoryQuery;
pub use meals::MealQuery;
pub use orders::OrderQuery;
pub use reviews::ReviewQuery;

use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderMap, header};
use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;
use crate::middleware::session::SESSION_COOKIE_NAME;

use cache::{CacheKey, CacheValue};

/// Message shown for transport and decoding failures.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Maximum cached catalog responses.
const CACHE_CAPACITY: u64 = 1000;

/// Characters of a response body kept in logs.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur when calling the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Remote { status: StatusCode, message: String },

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request URL could not be built from the configured base.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl ApiError {
    /// The message to show an end user.
    ///
    /// Remote failures are shown verbatim; anything unexpected collapses to
    /// [`GENERIC_ERROR_MESSAGE`] so raw transport errors never leak.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message, .. } | Self::NotFound(message) => message.clone(),
            Self::Http(_) | Self::Timeout | Self::Parse(_) | Self::InvalidUrl(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Whether the failure happened on our side of the wire or in transit.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout | Self::Parse(_) | Self::InvalidUrl(_)
        )
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// The caller's cookie header, forwarded to the API and auth provider.
#[derive(Clone)]
pub struct Credentials(SecretString);

impl Credentials {
    /// Wrap a raw `Cookie` header value. Blank values yield `None`.
    #[must_use]
    pub fn from_cookie_header(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(value.to_string())))
        }
    }

    /// Collect every `Cookie` header of an incoming request.
    ///
    /// The storefront's own session cookie stays behind.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let joined = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .map(str::trim)
            .filter(|pair| !pair.is_empty() && !is_session_cookie(pair))
            .collect::<Vec<_>>()
            .join("; ");
        Self::from_cookie_header(&joined)
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

fn is_session_cookie(pair: &str) -> bool {
    pair.split_once('=')
        .is_some_and(|(name, _)| name.trim() == SESSION_COOKIE_NAME)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials([REDACTED])")
    }
}

// =============================================================================
// Response Shapes
// =============================================================================

/// Pagination details returned by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default, alias = "count")]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<PageMeta>,
}

impl<T> Page<T> {
    /// A page with no pagination details.
    #[must_use]
    pub const fn unpaged(items: Vec<T>) -> Self {
        Self { items, meta: None }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Paged {
        data: Vec<T>,
        #[serde(default)]
        meta: Option<PageMeta>,
    },
    Plain(Vec<T>),
}

impl<T> From<Listing<T>> for Page<T> {
    fn from(listing: Listing<T>) -> Self {
        match listing {
            Listing::Paged { data, meta } => Self { items: data, meta },
            Listing::Plain(items) => Self::unpaged(items),
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<NestedError>,
}

#[derive(Deserialize)]
struct NestedError {
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or_else(|| self.error.and_then(|e| e.message))
            .filter(|m| !m.trim().is_empty())
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the marketplace REST API and the auth provider.
///
/// Cheap to clone; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    auth_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Http)?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .support_invalidation_closures()
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                auth_url: config.auth_url.clone(),
                cache,
            }),
        })
    }

    /// The REST API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Check that the API answers at all.
    ///
    /// Any HTTP response counts as reachable; only transport failures do not.
    pub async fn ping(&self) -> bool {
        self.inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await
            .is_ok()
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        credentials: Option<&Credentials>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = join_url(&self.inner.base_url, segments)?;
        Ok(with_credentials(
            self.inner.client.request(method, url),
            credentials,
        ))
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        let value = self.inner.cache.get(key).await;
        if value.is_some() {
            tracing::debug!(?key, "Cache hit");
        }
        value
    }

    async fn cache(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    /// Drop every cached entry whose key matches.
    fn invalidate(&self, predicate: fn(&CacheKey) -> bool) {
        if let Err(e) = self
            .inner
            .cache
            .invalidate_entries_if(move |key, _| predicate(key))
        {
            tracing::warn!(error = %e, "Failed to invalidate catalog cache");
        }
    }

    /// Send a request and decode the `data` field of the response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let body = self.execute_raw(request, fallback).await?;
        let envelope: Envelope<T> = decode(&body)?;
        Ok(envelope.data)
    }

    /// Send a request and decode a list payload.
    async fn execute_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<Page<T>, ApiError> {
        let body = self.execute_raw(request, fallback).await?;
        let envelope: Envelope<Listing<T>> = decode(&body)?;
        Ok(envelope.data.into())
    }

    /// Send a request whose success body is ignored.
    async fn execute_unit(&self, request: RequestBuilder, fallback: &str) -> Result<(), ApiError> {
        self.execute_raw(request, fallback).await.map(|_| ())
    }

    async fn execute_raw(&self, request: RequestBuilder, fallback: &str) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::warn!(
            status = %status,
            body = %truncate(&body),
            "FoodHub API returned non-success status"
        );

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| fallback.to_string());

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(message));
        }
        Err(ApiError::Remote { status, message })
    }
}

/// Append percent-encoded path segments to a base URL.
fn join_url(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn with_credentials(request: RequestBuilder, credentials: Option<&Credentials>) -> RequestBuilder {
    match credentials {
        Some(credentials) => request.header(reqwest::header::COOKIE, credentials.expose()),
        None => request,
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(body),
            "Failed to parse FoodHub API response"
        );
        ApiError::Parse(e)
    })
}

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}
