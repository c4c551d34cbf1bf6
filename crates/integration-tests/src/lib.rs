//! Integration tests for FoodHub.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p foodhub-integration-tests
//! ```
//!
//! No external services are needed. Each test spawns:
//!
//! - a [`FakeBackend`]: an in-process axum server that plays both the
//!   marketplace REST API (`/api/...`) and the auth provider
//!   (`/auth/get-session`), with seeded in-memory data;
//! - the storefront itself, configured against that backend and bound to an
//!   ephemeral port.
//!
//! Tests then drive the storefront over real HTTP with a cookie-keeping
//! `reqwest` client, exactly as a browser would.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use chrono::Utc;
use foodhub_core::models::{
    Category, CreateOrder, CreateReview, Meal, MealInput, MealSummary, Order, OrderItem, Provider,
    ProviderProfileInput, Review, UpdateOrderStatus, UpdateReview, User, UserProfileInput,
};
use foodhub_core::{
    CategoryId, MealId, OrderId, OrderStatus, ProviderId, ReviewId, Role, UserId, UserStatus,
};
use foodhub_storefront::api::SessionUser;
use foodhub_storefront::config::{ApiConfig, StorefrontConfig};
use foodhub_storefront::state::AppState;
use reqwest::cookie::Jar;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

/// Name of the auth provider's session cookie.
pub const AUTH_COOKIE: &str = "foodhub.session_token";

/// Session token of the seeded customer.
pub const CUSTOMER_TOKEN: &str = "customer-token";
/// Session token of the seeded provider (owner of `p1`).
pub const PROVIDER_TOKEN: &str = "provider-token";
/// Session token of the seeded admin.
pub const ADMIN_TOKEN: &str = "admin-token";

/// Seeded customer ID.
pub const CUSTOMER_ID: &str = "u-customer";

/// Session secret used by test storefronts.
const TEST_SESSION_SECRET: &str =
    "f7Kq2xLm9Vb4Rt8Zp1Wn6Yc3Hs5Dj0Ga7Ue2Io9Pk4Tl8Mv1Nb6Xr3Qw5Ez0Ah2Sd";

// =============================================================================
// Fake Backend
// =============================================================================

/// In-memory state behind the fake marketplace API.
#[derive(Debug, Default)]
pub struct BackendData {
    pub categories: Vec<Category>,
    pub providers: Vec<Provider>,
    pub meals: Vec<Meal>,
    pub users: Vec<User>,
    pub orders: Vec<Order>,
    pub reviews: Vec<Review>,
    /// Auth session token to user ID.
    pub sessions: HashMap<String, UserId>,
    /// When set, order creation fails with this message.
    pub reject_orders: Option<String>,
    /// Number of order-creation requests received.
    pub order_requests: usize,
    /// Number of status-update requests received.
    pub status_requests: usize,
    /// Artificial latency for list endpoints.
    pub list_delay: Option<Duration>,
}

impl BackendData {
    /// Seed two providers, a few meals, and one user per role.
    #[must_use]
    pub fn seeded() -> Self {
        let star = provider("p1", "Star Kabab");
        let roma = provider("p2", "Pizza Roma");

        let mut data = Self {
            categories: vec![
                category("c1", "Biryani", "🍛"),
                category("c2", "Pizza", "🍕"),
            ],
            meals: vec![
                meal("m1", &star, "c1", "Kacchi Biryani", 250, true),
                meal("m2", &star, "c1", "Borhani", 60, true),
                meal("m3", &roma, "c2", "Margherita", 500, true),
                meal("m4", &star, "c1", "Tehari", 180, false),
            ],
            users: vec![
                user(CUSTOMER_ID, "Karim", Role::Customer, None),
                user("u-provider", "Rahim", Role::Provider, Some(star.clone())),
                user("u-admin", "Admin", Role::Admin, None),
            ],
            providers: vec![star, roma],
            ..Self::default()
        };

        // Margherita carries no embedded profile so the provider is looked up.
        if let Some(margherita) = data.meals.iter_mut().find(|m| m.id.as_str() == "m3") {
            margherita.provider_profile = None;
        }

        for (token, id) in [
            (CUSTOMER_TOKEN, CUSTOMER_ID),
            (PROVIDER_TOKEN, "u-provider"),
            (ADMIN_TOKEN, "u-admin"),
        ] {
            data.sessions.insert(token.to_string(), UserId::new(id));
        }
        data
    }

    /// Insert an order directly, bypassing checkout.
    pub fn insert_order(&mut self, status: OrderStatus, meals: &[(&str, u32)]) -> OrderId {
        let id = OrderId::new(format!("o{}", self.orders.len() + 1));
        let order_items: Vec<OrderItem> = meals
            .iter()
            .filter_map(|(meal_id, quantity)| {
                let meal = self.meals.iter().find(|m| m.id.as_str() == *meal_id)?;
                Some(order_item(meal, *quantity))
            })
            .collect();
        let provider_id = self
            .meals
            .iter()
            .find(|m| meals.first().is_some_and(|(id, _)| m.id.as_str() == *id))
            .map_or_else(|| ProviderId::new("p1"), |m| m.provider_id.clone());

        self.orders.push(Order {
            id: id.clone(),
            customer_id: UserId::new(CUSTOMER_ID),
            provider_id,
            total_amount: order_items
                .iter()
                .map(|item| item.price * Decimal::from(item.quantity))
                .sum(),
            order_items,
            address: "House 12, Road 5, Dhanmondi".to_string(),
            payment_type: foodhub_core::PaymentType::CashOnDelivery,
            status,
            created_at: Some(Utc::now()),
            updated_at: None,
            customer: None,
            provider: None,
            reviews: Vec::new(),
        });
        id
    }

    fn session_user(&self, headers: &HeaderMap) -> Option<&User> {
        let token = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == AUTH_COOKIE)
            .map(|(_, value)| value)?;
        let id = self.sessions.get(token)?;
        self.users.iter().find(|u| &u.id == id)
    }
}

fn provider(id: &str, name: &str) -> Provider {
    Provider {
        id: ProviderId::new(id),
        name: name.to_string(),
        rating: 4.5,
        delivery_time: "30-40 min".to_string(),
        price_range: "৳৳".to_string(),
        cover_image: String::new(),
        logo: String::new(),
        address: None,
        description: None,
        signature_dish: None,
    }
}

fn category(id: &str, name: &str, emoji: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        emoji: emoji.to_string(),
        image: String::new(),
        created_at: None,
        updated_at: None,
    }
}

fn meal(id: &str, provider: &Provider, category: &str, name: &str, price: i64, available: bool) -> Meal {
    Meal {
        id: MealId::new(id),
        provider_id: provider.id.clone(),
        category_id: CategoryId::new(category),
        name: name.to_string(),
        description: String::new(),
        price: Decimal::new(price, 0),
        image: String::new(),
        is_available: available,
        is_featured: false,
        provider_profile: Some(provider.clone()),
        category: None,
    }
}

fn user(id: &str, name: &str, role: Role, provider_profile: Option<Provider>) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        email: format!("{}@foodhub.test", name.to_lowercase()),
        email_verified: true,
        image: None,
        role,
        phone: None,
        address: None,
        status: UserStatus::Active,
        provider_profile,
    }
}

fn order_item(meal: &Meal, quantity: u32) -> OrderItem {
    OrderItem {
        meal_id: meal.id.clone(),
        quantity,
        price: meal.price,
        meal: Some(MealSummary {
            id: meal.id.clone(),
            name: meal.name.clone(),
            image: meal.image.clone(),
        }),
    }
}

/// Handle to a running fake backend.
#[derive(Clone)]
pub struct FakeBackend {
    data: Arc<Mutex<BackendData>>,
    addr: SocketAddr,
}

impl FakeBackend {
    /// Start a backend with the seeded data.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let data = Arc::new(Mutex::new(BackendData::seeded()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");

        let app = backend_router(Arc::clone(&data));
        tokio::spawn(async move { axum::serve(listener, app).await });

        Self { data, addr }
    }

    /// Lock the backend's data for inspection or setup.
    pub fn data(&self) -> MutexGuard<'_, BackendData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Base URL of the fake marketplace API.
    ///
    /// # Panics
    ///
    /// Panics if the address does not form a URL.
    #[must_use]
    pub fn api_url(&self) -> Url {
        Url::parse(&format!("http://{}/api/", self.addr)).expect("valid API URL")
    }

    /// Base URL of the fake auth provider.
    ///
    /// # Panics
    ///
    /// Panics if the address does not form a URL.
    #[must_use]
    pub fn auth_url(&self) -> Url {
        Url::parse(&format!("http://{}/auth/", self.addr)).expect("valid auth URL")
    }
}

type Shared = Arc<Mutex<BackendData>>;

fn lock(data: &Shared) -> MutexGuard<'_, BackendData> {
    data.lock().unwrap_or_else(PoisonError::into_inner)
}

fn backend_router(data: Shared) -> Router {
    Router::new()
        .route("/api/", get(|| async { "ok" }))
        .route("/auth/get-session", get(get_session))
        .route("/api/categories", get(list_categories))
        .route(
            "/api/provider-profiles",
            get(list_providers).post(create_provider_profile),
        )
        .route(
            "/api/provider-profiles/{id}",
            get(get_provider).patch(update_provider_profile),
        )
        .route("/api/meals", get(list_meals).post(create_meal))
        .route("/api/meals/{id}", get(get_meal).patch(update_meal))
        .route("/api/users/me", get(current_user))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user).patch(update_user_profile))
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/status", patch(update_order_status))
        .route("/api/reviews", get(list_reviews).post(create_review))
        .route(
            "/api/reviews/{id}",
            patch(update_review).delete(delete_review),
        )
        .with_state(data)
}

fn data_response<T: Serialize>(data: T) -> Response {
    Json(json!({ "data": data })).into_response()
}

fn paged_response<T: Serialize>(items: Vec<T>) -> Response {
    let total = items.len();
    Json(json!({
        "data": {
            "data": items,
            "meta": { "page": 1, "limit": 10, "total": total, "totalPages": 1 }
        }
    }))
    .into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn get_session(State(data): State<Shared>, headers: HeaderMap) -> Json<Value> {
    let data = lock(&data);
    let body = data.session_user(&headers).map_or(Value::Null, |user| {
        json!({
            "session": { "id": format!("s-{}", user.id) },
            "user": SessionUser {
                id: user.id.clone(),
                role: user.role,
                name: user.name.clone(),
                email: user.email.clone(),
            }
        })
    });
    Json(body)
}

async fn list_categories(State(data): State<Shared>) -> Response {
    let categories = lock(&data).categories.clone();
    Json(json!({ "data": categories })).into_response()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    search: Option<String>,
    provider_id: Option<String>,
    customer_id: Option<String>,
    meal_id: Option<String>,
}

fn matches_search(name: &str, search: Option<&String>) -> bool {
    search.is_none_or(|term| name.to_lowercase().contains(&term.to_lowercase()))
}

async fn list_providers(State(data): State<Shared>, Query(params): Query<ListParams>) -> Response {
    let (providers, delay) = {
        let data = lock(&data);
        let providers: Vec<Provider> = data
            .providers
            .iter()
            .filter(|p| matches_search(&p.name, params.search.as_ref()))
            .cloned()
            .collect();
        (providers, data.list_delay)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    paged_response(providers)
}

async fn get_provider(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    let data = lock(&data);
    match data.providers.iter().find(|p| p.id.as_str() == id) {
        Some(provider) => data_response(provider),
        None => failure(StatusCode::NOT_FOUND, "Provider not found"),
    }
}

async fn list_meals(State(data): State<Shared>, Query(params): Query<ListParams>) -> Response {
    let (meals, delay) = {
        let data = lock(&data);
        let meals: Vec<Meal> = data
            .meals
            .iter()
            .filter(|m| matches_search(&m.name, params.search.as_ref()))
            .filter(|m| {
                params
                    .provider_id
                    .as_ref()
                    .is_none_or(|id| m.provider_id.as_str() == id)
            })
            .cloned()
            .collect();
        (meals, data.list_delay)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    paged_response(meals)
}

async fn get_meal(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    let data = lock(&data);
    match data.meals.iter().find(|m| m.id.as_str() == id) {
        Some(meal) => data_response(meal),
        None => failure(StatusCode::NOT_FOUND, "Meal not found"),
    }
}

async fn current_user(State(data): State<Shared>, headers: HeaderMap) -> Response {
    let data = lock(&data);
    match data.session_user(&headers) {
        Some(user) => data_response(user),
        None => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

async fn list_users(State(data): State<Shared>, headers: HeaderMap) -> Response {
    let data = lock(&data);
    match data.session_user(&headers) {
        Some(user) if user.role == Role::Admin => paged_response(data.users.clone()),
        Some(_) => failure(StatusCode::FORBIDDEN, "Forbidden"),
        None => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

async fn get_user(State(data): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let data = lock(&data);
    match data.session_user(&headers) {
        Some(caller) if caller.role == Role::Admin => {
            match data.users.iter().find(|u| u.id.as_str() == id) {
                Some(user) => data_response(user),
                None => failure(StatusCode::NOT_FOUND, "User not found"),
            }
        }
        Some(_) => failure(StatusCode::FORBIDDEN, "Forbidden"),
        None => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

async fn update_user_profile(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UserProfileInput>,
) -> Response {
    let mut data = lock(&data);
    match data.session_user(&headers) {
        Some(caller) if caller.id.as_str() == id => {}
        Some(_) => return failure(StatusCode::FORBIDDEN, "Forbidden"),
        None => return failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
    let Some(user) = data.users.iter_mut().find(|u| u.id.as_str() == id) else {
        return failure(StatusCode::NOT_FOUND, "User not found");
    };
    user.name = payload.name;
    user.phone = Some(payload.phone).filter(|p| !p.is_empty());
    user.image = Some(payload.image).filter(|i| !i.is_empty());
    data_response(user.clone())
}

/// Creating a profile promotes the caller to provider.
async fn create_provider_profile(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(payload): Json<ProviderProfileInput>,
) -> Response {
    let mut data = lock(&data);
    let Some(caller) = data.session_user(&headers).map(|u| u.id.clone()) else {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    let mut profile = provider(&format!("p{}", data.providers.len() + 1), &payload.name);
    profile.address = Some(payload.address);
    profile.description = Some(payload.description);
    profile.logo = payload.logo;

    if let Some(user) = data.users.iter_mut().find(|u| u.id == caller) {
        if user.provider_profile.is_some() {
            return failure(StatusCode::CONFLICT, "Provider profile already exists");
        }
        user.role = Role::Provider;
        user.provider_profile = Some(profile.clone());
    }
    data.providers.push(profile.clone());
    (StatusCode::CREATED, Json(json!({ "data": profile }))).into_response()
}

async fn update_provider_profile(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<ProviderProfileInput>,
) -> Response {
    let mut data = lock(&data);
    let owns = data
        .session_user(&headers)
        .and_then(|u| u.provider_profile.as_ref())
        .is_some_and(|p| p.id.as_str() == id);
    if !owns {
        return failure(StatusCode::FORBIDDEN, "Forbidden");
    }

    let apply = |profile: &mut Provider| {
        profile.name.clone_from(&payload.name);
        profile.address = Some(payload.address.clone());
        profile.description = Some(payload.description.clone());
        profile.logo.clone_from(&payload.logo);
    };
    for user in &mut data.users {
        user.provider_profile
            .iter_mut()
            .filter(|p| p.id.as_str() == id)
            .for_each(apply);
    }
    match data.providers.iter_mut().find(|p| p.id.as_str() == id) {
        Some(profile) => {
            apply(profile);
            data_response(profile.clone())
        }
        None => failure(StatusCode::NOT_FOUND, "Provider not found"),
    }
}

fn meal_from_input(id: MealId, input: MealInput, profile: Option<Provider>) -> Meal {
    Meal {
        id,
        provider_id: input.provider_id,
        category_id: input.category_id,
        name: input.name,
        description: input.description,
        price: input.price,
        image: input.image,
        is_available: input.is_available,
        is_featured: input.is_featured,
        provider_profile: profile,
        category: None,
    }
}

fn owns_provider(data: &BackendData, headers: &HeaderMap, provider_id: &ProviderId) -> bool {
    data.session_user(headers)
        .and_then(|u| u.provider_profile.as_ref())
        .is_some_and(|p| &p.id == provider_id)
}

async fn create_meal(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(payload): Json<MealInput>,
) -> Response {
    let mut data = lock(&data);
    if !owns_provider(&data, &headers, &payload.provider_id) {
        return failure(StatusCode::FORBIDDEN, "Forbidden");
    }
    let id = MealId::new(format!("m{}", data.meals.len() + 1));
    let profile = data
        .providers
        .iter()
        .find(|p| p.id == payload.provider_id)
        .cloned();
    let meal = meal_from_input(id, payload, profile);
    data.meals.push(meal.clone());
    (StatusCode::CREATED, Json(json!({ "data": meal }))).into_response()
}

async fn update_meal(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<MealInput>,
) -> Response {
    let mut data = lock(&data);
    let Some(owner) = data
        .meals
        .iter()
        .find(|m| m.id.as_str() == id)
        .map(|m| m.provider_id.clone())
    else {
        return failure(StatusCode::NOT_FOUND, "Meal not found");
    };
    if !owns_provider(&data, &headers, &owner) {
        return failure(StatusCode::FORBIDDEN, "Forbidden");
    }
    let Some(existing) = data.meals.iter_mut().find(|m| m.id.as_str() == id) else {
        return failure(StatusCode::NOT_FOUND, "Meal not found");
    };
    let profile = existing.provider_profile.take();
    *existing = meal_from_input(MealId::new(id), payload, profile);
    data_response(existing.clone())
}

async fn create_order(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(payload): Json<CreateOrder>,
) -> Response {
    let mut data = lock(&data);
    data.order_requests += 1;

    if data.session_user(&headers).is_none() {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if let Some(message) = data.reject_orders.clone() {
        return failure(StatusCode::BAD_REQUEST, &message);
    }

    let order_items = payload
        .order_items
        .iter()
        .map(|item| OrderItem {
            meal_id: item.meal_id.clone(),
            quantity: item.quantity,
            price: item.price,
            meal: None,
        })
        .collect();

    let order = Order {
        id: OrderId::new(format!("o{}", data.orders.len() + 1)),
        customer_id: payload.customer_id,
        provider_id: payload.provider_id,
        order_items,
        total_amount: payload.total_amount,
        address: payload.address,
        payment_type: payload.payment_type,
        status: OrderStatus::Placed,
        created_at: Some(Utc::now()),
        updated_at: None,
        customer: None,
        provider: None,
        reviews: Vec::new(),
    };
    data.orders.push(order.clone());
    (StatusCode::CREATED, Json(json!({ "data": order }))).into_response()
}

async fn list_orders(
    State(data): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let data = lock(&data);
    if data.session_user(&headers).is_none() {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let orders: Vec<Order> = data
        .orders
        .iter()
        .filter(|o| {
            params
                .customer_id
                .as_ref()
                .is_none_or(|id| o.customer_id.as_str() == id)
        })
        .filter(|o| {
            params
                .provider_id
                .as_ref()
                .is_none_or(|id| o.provider_id.as_str() == id)
        })
        .cloned()
        .collect();
    paged_response(orders)
}

async fn get_order(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let data = lock(&data);
    if data.session_user(&headers).is_none() {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    match data.orders.iter().find(|o| o.id.as_str() == id) {
        Some(order) => data_response(order),
        None => failure(StatusCode::NOT_FOUND, "Order not found"),
    }
}

/// Answers without associations, like the real endpoint.
async fn update_order_status(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderStatus>,
) -> Response {
    let mut data = lock(&data);
    data.status_requests += 1;
    if data.session_user(&headers).is_none() {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let Some(order) = data.orders.iter_mut().find(|o| o.id.as_str() == id) else {
        return failure(StatusCode::NOT_FOUND, "Order not found");
    };
    order.status = payload.status;

    let mut bare = order.clone();
    bare.order_items.clear();
    bare.reviews.clear();
    data_response(bare)
}

async fn list_reviews(State(data): State<Shared>, Query(params): Query<ListParams>) -> Response {
    let data = lock(&data);
    let reviews: Vec<Review> = data
        .reviews
        .iter()
        .filter(|r| {
            params
                .meal_id
                .as_ref()
                .is_none_or(|id| r.meal_id.as_str() == id)
        })
        .filter(|r| {
            params
                .customer_id
                .as_ref()
                .is_none_or(|id| r.customer_id.as_str() == id)
        })
        .cloned()
        .collect();
    Json(json!({ "data": reviews })).into_response()
}

async fn create_review(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(payload): Json<CreateReview>,
) -> Response {
    let mut data = lock(&data);
    if data.session_user(&headers).is_none() {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let review = Review {
        id: ReviewId::new(format!("r{}", data.reviews.len() + 1)),
        customer_id: payload.customer_id,
        meal_id: payload.meal_id,
        order_id: payload.order_id,
        rating: payload.rating,
        comment: payload.comment,
        created_at: Utc::now(),
        customer: None,
        meal: None,
    };
    if let Some(order) = data.orders.iter_mut().find(|o| o.id == review.order_id) {
        order.reviews.push(review.clone());
    }
    data.reviews.push(review.clone());
    (StatusCode::CREATED, Json(json!({ "data": review }))).into_response()
}

async fn update_review(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReview>,
) -> Response {
    let mut data = lock(&data);
    if data.session_user(&headers).is_none() {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let apply = |review: &mut Review| {
        if let Some(rating) = payload.rating {
            review.rating = rating;
        }
        if payload.comment.is_some() {
            review.comment.clone_from(&payload.comment);
        }
    };

    for order in &mut data.orders {
        order
            .reviews
            .iter_mut()
            .filter(|r| r.id.as_str() == id)
            .for_each(apply);
    }
    match data.reviews.iter_mut().find(|r| r.id.as_str() == id) {
        Some(review) => {
            apply(review);
            data_response(review.clone())
        }
        None => failure(StatusCode::NOT_FOUND, "Review not found"),
    }
}

async fn delete_review(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut data = lock(&data);
    if data.session_user(&headers).is_none() {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let before = data.reviews.len();
    data.reviews.retain(|r| r.id.as_str() != id);
    if data.reviews.len() == before {
        return failure(StatusCode::NOT_FOUND, "Review not found");
    }
    for order in &mut data.orders {
        order.reviews.retain(|r| r.id.as_str() != id);
    }
    data_response(Value::Null)
}

// =============================================================================
// Storefront Under Test
// =============================================================================

/// A running storefront wired to its own fake backend.
pub struct TestApp {
    pub url: Url,
    pub backend: FakeBackend,
    pub client: reqwest::Client,
    jar: Arc<Jar>,
}

impl TestApp {
    /// Start a backend and a storefront with a short search debounce.
    pub async fn spawn() -> Self {
        Self::spawn_with_debounce(Duration::from_millis(50)).await
    }

    /// Start a backend and a storefront with the given search debounce.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot start.
    pub async fn spawn_with_debounce(search_debounce: Duration) -> Self {
        let backend = FakeBackend::spawn().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront");
        let addr = listener.local_addr().expect("Storefront has no address");
        let url = Url::parse(&format!("http://{addr}/")).expect("valid storefront URL");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: url.to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET.to_string()),
            api: ApiConfig {
                base_url: backend.api_url(),
                auth_url: backend.auth_url(),
                timeout: Duration::from_secs(5),
                cache_ttl: Duration::from_secs(60),
            },
            search_debounce,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config).expect("Failed to create application state");
        let app = foodhub_storefront::app(state).expect("Failed to build storefront");
        tokio::spawn(async move { axum::serve(listener, app).await });

        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url,
            backend,
            client,
            jar,
        }
    }

    /// Sign the client in with an auth provider session token.
    pub fn sign_in(&self, token: &str) {
        self.jar
            .add_cookie_str(&format!("{AUTH_COOKIE}={token}; Path=/"), &self.url);
    }

    /// Absolute URL for a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if the path does not form a URL.
    #[must_use]
    pub fn at(&self, path: &str) -> Url {
        self.url
            .join(path.trim_start_matches('/'))
            .expect("valid storefront path")
    }

    /// GET a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.at(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a JSON body to a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.at(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    /// DELETE a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.at(path))
            .send()
            .await
            .expect("DELETE request failed")
    }
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.expect("response body is not JSON")
}

/// Parse a decimal that may arrive as a JSON string or number.
///
/// # Panics
///
/// Panics if the value is not a decimal.
#[must_use]
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("expected a decimal, got {other}"),
    }
}
