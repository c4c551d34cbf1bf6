//! Order status transition tests.

#![allow(clippy::unwrap_used)]

use foodhub_core::OrderStatus;
use foodhub_integration_tests::{ADMIN_TOKEN, CUSTOMER_TOKEN, PROVIDER_TOKEN, TestApp, json_body};
use reqwest::StatusCode;
use serde_json::json;

fn order_in(app: &TestApp, status: OrderStatus) -> String {
    app.backend
        .data()
        .insert_order(status, &[("m1", 2), ("m2", 1)])
        .to_string()
}

async fn set_status(app: &TestApp, order_id: &str, status: &str) -> reqwest::Response {
    app.post(
        &format!("/orders/{order_id}/status"),
        &json!({ "status": status }),
    )
    .await
}

fn stored_status(app: &TestApp, order_id: &str) -> OrderStatus {
    app.backend
        .data()
        .orders
        .iter()
        .find(|o| o.id.as_str() == order_id)
        .unwrap()
        .status
}

#[tokio::test]
async fn test_customer_cancels_placed_order() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);
    let id = order_in(&app, OrderStatus::Placed);

    let response = set_status(&app, &id, "CANCELLED").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["order"]["status"], "CANCELLED");
    assert_eq!(body["data"]["statusLabel"], "CANCELLED");
    assert_eq!(body["data"]["canCancel"], false);
    // Lines survive even though the status endpoint omits them
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(stored_status(&app, &id), OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_customer_cannot_cancel_once_preparing() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);
    let id = order_in(&app, OrderStatus::Preparing);

    let response = set_status(&app, &id, "CANCELLED").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.backend.data().status_requests, 0);
    assert_eq!(stored_status(&app, &id), OrderStatus::Preparing);
}

#[tokio::test]
async fn test_provider_advances_order() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);
    let id = order_in(&app, OrderStatus::Placed);

    for (target, label) in [
        ("PREPARING", "PREPARING"),
        ("READY", "READY"),
        ("OUT_FOR_DELIVERY", "OUT FOR DELIVERY"),
        ("DELIVERED", "DELIVERED"),
    ] {
        let response = set_status(&app, &id, target).await;
        assert_eq!(response.status(), StatusCode::OK, "moving to {target}");
        let body = json_body(response).await;
        assert_eq!(body["data"]["statusLabel"], label);
    }

    assert_eq!(stored_status(&app, &id), OrderStatus::Delivered);
}

#[tokio::test]
async fn test_provider_may_skip_ahead_but_not_back() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);
    let id = order_in(&app, OrderStatus::Ready);

    let back = set_status(&app, &id, "PREPARING").await;
    assert_eq!(back.status(), StatusCode::CONFLICT);

    let skip = set_status(&app, &id, "DELIVERED").await;
    assert_eq!(skip.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_terminal_order_is_conflict() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);
    let id = order_in(&app, OrderStatus::Delivered);

    let response = set_status(&app, &id, "CANCELLED").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(
        body["error"]["message"],
        "order is already DELIVERED and can no longer change"
    );
    assert_eq!(app.backend.data().status_requests, 0);
}

#[tokio::test]
async fn test_admin_cannot_change_status() {
    let app = TestApp::spawn().await;
    app.sign_in(ADMIN_TOKEN);
    let id = order_in(&app, OrderStatus::Placed);

    let response = set_status(&app, &id, "PREPARING").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_status_change_requires_sign_in() {
    let app = TestApp::spawn().await;
    let id = order_in(&app, OrderStatus::Placed);

    let response = set_status(&app, &id, "CANCELLED").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_order_detail_for_customer() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);
    let id = order_in(&app, OrderStatus::Placed);

    let body = json_body(app.get(&format!("/orders/{id}")).await).await;

    assert_eq!(body["data"]["canCancel"], true);
    assert_eq!(body["data"]["allowedTransitions"], json!(["CANCELLED"]));
    let lines = body["data"]["items"].as_array().unwrap();
    assert_eq!(lines.first().unwrap()["name"], "Kacchi Biryani");
    assert_eq!(lines.first().unwrap()["review"]["action"], "unavailable");
}

#[tokio::test]
async fn test_missing_order_is_not_found() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);

    let response = app.get("/orders/o404").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Order not found");
}

#[tokio::test]
async fn test_customer_lists_own_orders() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);
    order_in(&app, OrderStatus::Placed);
    order_in(&app, OrderStatus::Delivered);

    let body = json_body(app.get("/orders").await).await;

    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
}
