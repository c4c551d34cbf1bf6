//! Order submission tests.

#![allow(clippy::unwrap_used)]

use foodhub_integration_tests::{CUSTOMER_ID, CUSTOMER_TOKEN, TestApp, decimal, json_body};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

const ADDRESS: &str = "House 12, Road 5, Dhanmondi";

async fn fill_cart(app: &TestApp) {
    let response = app.post("/cart/add", &json!({ "mealId": "m1" })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn cart_items(app: &TestApp) -> u64 {
    let body = json_body(app.get("/cart").await).await;
    body["data"]["totalItems"].as_u64().unwrap()
}

#[tokio::test]
async fn test_empty_cart_is_reported_before_sign_in() {
    let app = TestApp::spawn().await;

    let response = app.post("/checkout", &json!({ "address": ADDRESS })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Your cart is empty.");
    assert_eq!(app.backend.data().order_requests, 0);
}

#[tokio::test]
async fn test_guest_cannot_place_order() {
    let app = TestApp::spawn().await;
    fill_cart(&app).await;

    let response = app.post("/checkout", &json!({ "address": ADDRESS })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Please log in to place an order.");
    assert_eq!(app.backend.data().order_requests, 0);
    assert_eq!(cart_items(&app).await, 1);
}

#[tokio::test]
async fn test_guest_browser_is_sent_to_login() {
    let app = TestApp::spawn().await;
    fill_cart(&app).await;

    let response = app
        .client
        .post(app.at("/checkout"))
        .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
        .json(&json!({ "address": ADDRESS }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[reqwest::header::LOCATION], "/login");
    assert_eq!(app.backend.data().order_requests, 0);
    assert_eq!(cart_items(&app).await, 1);
}

#[tokio::test]
async fn test_blank_address_never_reaches_api() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);
    fill_cart(&app).await;

    let response = app.post("/checkout", &json!({ "address": "   " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Please provide a delivery address.");
    assert_eq!(app.backend.data().order_requests, 0);
}

#[tokio::test]
async fn test_place_order_sends_cart_and_clears_it() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);
    fill_cart(&app).await;

    let response = app.post("/checkout", &json!({ "address": ADDRESS })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let order = &body["data"];
    assert_eq!(order["status"], "PLACED");
    assert_eq!(order["customerId"], CUSTOMER_ID);
    assert_eq!(order["providerId"], "p1");
    assert_eq!(decimal(&order["totalAmount"]), Decimal::new(31250, 2));

    {
        let data = app.backend.data();
        assert_eq!(data.order_requests, 1);
        let stored = data.orders.first().unwrap();
        assert_eq!(stored.address, ADDRESS);
        assert_eq!(stored.order_items.len(), 1);
        assert_eq!(stored.order_items.first().unwrap().price, Decimal::new(250, 0));
    }

    assert_eq!(cart_items(&app).await, 0);
}

#[tokio::test]
async fn test_rejected_order_keeps_cart() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);
    fill_cart(&app).await;
    app.backend.data().reject_orders = Some("Restaurant is closed".to_string());

    let response = app.post("/checkout", &json!({ "address": ADDRESS })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Restaurant is closed");
    assert_eq!(app.backend.data().order_requests, 1);
    assert_eq!(cart_items(&app).await, 1);
}
