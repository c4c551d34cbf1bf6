//! Marketplace API client tests against the fake backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use foodhub_core::{MealId, OrderId, ProviderId};
use foodhub_integration_tests::{CUSTOMER_TOKEN, AUTH_COOKIE, FakeBackend};
use foodhub_storefront::api::{ApiClient, ApiError, CategoryQuery, Credentials, MealQuery};
use foodhub_storefront::config::ApiConfig;
use rust_decimal::Decimal;

fn client(backend: &FakeBackend) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: backend.api_url(),
        auth_url: backend.auth_url(),
        timeout: Duration::from_secs(5),
        cache_ttl: Duration::from_secs(60),
    })
    .unwrap()
}

fn customer() -> Credentials {
    Credentials::from_cookie_header(&format!("{AUTH_COOKIE}={CUSTOMER_TOKEN}")).unwrap()
}

#[tokio::test]
async fn test_paged_list_is_unwrapped() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend);

    let query = MealQuery {
        provider_id: Some(ProviderId::new("p1")),
        ..MealQuery::default()
    };
    let page = api.list_meals(&query).await.unwrap();

    assert_eq!(page.items.len(), 3);
    assert!(page.items.iter().all(|m| m.provider_id.as_str() == "p1"));
    assert_eq!(page.meta.unwrap().total, 3);
}

#[tokio::test]
async fn test_plain_list_has_no_meta() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend);

    let page = api.list_categories(&CategoryQuery::default()).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert!(page.meta.is_none());
}

#[tokio::test]
async fn test_meal_price_decodes() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend);

    let meal = api.get_meal(&MealId::new("m1")).await.unwrap();

    assert_eq!(meal.name, "Kacchi Biryani");
    assert_eq!(meal.price, Decimal::new(250, 0));
    assert_eq!(meal.provider_profile.unwrap().name, "Star Kabab");
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend);

    let err = api.get_meal(&MealId::new("nope")).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.user_message(), "Meal not found");
}

#[tokio::test]
async fn test_remote_message_is_surfaced() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend);

    let err = api
        .get_order(
            &Credentials::from_cookie_header("unrelated=1").unwrap(),
            &OrderId::new("o1"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Remote { .. }));
    assert_eq!(err.user_message(), "Unauthorized");
}

#[tokio::test]
async fn test_session_lookup() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend);

    let user = api.get_session(&customer()).await.unwrap().unwrap();
    assert_eq!(user.name, "Karim");

    let nobody = api
        .get_session(&Credentials::from_cookie_header(&format!("{AUTH_COOKIE}=stale")).unwrap())
        .await
        .unwrap();
    assert!(nobody.is_none());
}

#[tokio::test]
async fn test_ping() {
    let backend = FakeBackend::spawn().await;
    assert!(client(&backend).ping().await);
}
