//! Health, catalog and dashboard tests.

#![allow(clippy::unwrap_used)]

use foodhub_core::OrderStatus;
use foodhub_integration_tests::{
    ADMIN_TOKEN, CUSTOMER_TOKEN, PROVIDER_TOKEN, TestApp, json_body,
};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");

    let ready = app.get("/health/ready").await;
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_provider_detail_includes_menu() {
    let app = TestApp::spawn().await;

    let body = json_body(app.get("/providers/p1").await).await;

    assert_eq!(body["data"]["name"], "Star Kabab");
    assert_eq!(body["data"]["meals"]["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_provider_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get("/providers/p9").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["message"], "Provider not found");
}

#[tokio::test]
async fn test_categories() {
    let app = TestApp::spawn().await;

    let body = json_body(app.get("/categories").await).await;

    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_dashboard_requires_sign_in() {
    let app = TestApp::spawn().await;

    let response = app.get("/dashboard").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_dashboard() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);
    app.backend
        .data()
        .insert_order(OrderStatus::Placed, &[("m1", 1)]);

    let body = json_body(app.get("/dashboard").await).await;

    assert_eq!(body["data"]["role"], "CUSTOMER");
    assert_eq!(body["data"]["orders"]["items"].as_array().unwrap().len(), 1);
    assert!(body["data"]["reviews"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_dashboard() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);

    let body = json_body(app.get("/dashboard").await).await;

    assert_eq!(body["data"]["role"], "PROVIDER");
    assert_eq!(body["data"]["profile"]["name"], "Star Kabab");
    assert_eq!(body["data"]["meals"]["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_admin_dashboard() {
    let app = TestApp::spawn().await;
    app.sign_in(ADMIN_TOKEN);

    let body = json_body(app.get("/dashboard").await).await;

    assert_eq!(body["data"]["role"], "ADMIN");
    assert_eq!(body["data"]["users"]["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["categories"]["items"].as_array().unwrap().len(), 2);
}
