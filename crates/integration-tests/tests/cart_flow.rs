//! Session cart tests over HTTP.

#![allow(clippy::unwrap_used)]

use foodhub_integration_tests::{TestApp, decimal, json_body};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

async fn add(app: &TestApp, meal_id: &str) -> Value {
    let response = app.post("/cart/add", &json!({ "mealId": meal_id })).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn test_new_visitor_has_empty_cart() {
    let app = TestApp::spawn().await;

    let body = json_body(app.get("/cart").await).await;

    assert!(body["error"].is_null());
    assert_eq!(body["data"]["totalItems"], 0);
    assert!(body["data"]["providerId"].is_null());
    assert_eq!(decimal(&body["data"]["totals"]["subtotal"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_add_same_meal_twice_increments_quantity() {
    let app = TestApp::spawn().await;

    let first = add(&app, "m1").await;
    assert_eq!(first["data"]["status"], "added");
    assert_eq!(first["data"]["notice"], "Kacchi Biryani added to cart");

    let second = add(&app, "m1").await;
    assert_eq!(second["data"]["quantity"], 2);

    let cart = &second["data"]["cart"];
    assert_eq!(cart["providerName"], "Star Kabab");
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["totalItems"], 2);
}

#[tokio::test]
async fn test_cart_totals_include_tax_and_delivery() {
    let app = TestApp::spawn().await;
    add(&app, "m1").await;

    let body = json_body(app.get("/checkout").await).await;
    let totals = &body["data"];

    assert_eq!(decimal(&totals["subtotal"]), Decimal::new(250, 0));
    assert_eq!(decimal(&totals["tax"]), Decimal::new(1250, 2));
    assert_eq!(decimal(&totals["deliveryCharge"]), Decimal::new(50, 0));
    assert_eq!(decimal(&totals["total"]), Decimal::new(31250, 2));
    assert_eq!(totals["formattedTotal"], "৳312.50");
}

#[tokio::test]
async fn test_empty_cart_summary_is_zero() {
    let app = TestApp::spawn().await;

    let body = json_body(app.get("/checkout").await).await;
    let totals = &body["data"];

    assert_eq!(decimal(&totals["deliveryCharge"]), Decimal::ZERO);
    assert_eq!(decimal(&totals["total"]), Decimal::ZERO);
    assert_eq!(totals["formattedTotal"], "৳0.00");
}

#[tokio::test]
async fn test_unavailable_meal_is_refused() {
    let app = TestApp::spawn().await;

    let response = app.post("/cart/add", &json!({ "mealId": "m4" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["message"], "This meal is currently unavailable.");
}

#[tokio::test]
async fn test_unknown_meal_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.post("/cart/add", &json!({ "mealId": "missing" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_provider_parks_the_add() {
    let app = TestApp::spawn().await;
    add(&app, "m1").await;

    let conflict = add(&app, "m3").await;
    assert_eq!(conflict["data"]["status"], "conflict");
    assert!(
        conflict["data"]["prompt"]
            .as_str()
            .unwrap()
            .contains("Star Kabab")
    );

    // The cart is untouched until the visitor decides
    let cart = json_body(app.get("/cart").await).await;
    assert_eq!(cart["data"]["providerName"], "Star Kabab");
}

#[tokio::test]
async fn test_confirm_replaces_cart() {
    let app = TestApp::spawn().await;
    add(&app, "m1").await;
    add(&app, "m2").await;
    add(&app, "m3").await;

    let body = json_body(app.post("/cart/add/confirm", &json!({})).await).await;

    let cart = &body["data"]["cart"];
    assert_eq!(body["data"]["notice"], "Margherita added to cart");
    assert_eq!(cart["providerId"], "p2");
    assert_eq!(cart["providerName"], "Pizza Roma");
    assert_eq!(cart["totalItems"], 1);

    // A second confirm has nothing to apply
    let again = app.post("/cart/add/confirm", &json!({})).await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_discard_keeps_cart() {
    let app = TestApp::spawn().await;
    add(&app, "m1").await;
    add(&app, "m3").await;

    let body = json_body(app.post("/cart/add/discard", &json!({})).await).await;
    assert_eq!(body["data"]["cart"]["providerId"], "p1");
    assert_eq!(body["data"]["cart"]["totalItems"], 1);

    let confirm = app.post("/cart/add/confirm", &json!({})).await;
    assert_eq!(confirm.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_quantity() {
    let app = TestApp::spawn().await;
    add(&app, "m1").await;

    let body = json_body(
        app.post("/cart/update", &json!({ "mealId": "m1", "quantity": 4 }))
            .await,
    )
    .await;
    assert_eq!(body["data"]["cart"]["totalItems"], 4);

    // Quantities below one are ignored
    let body = json_body(
        app.post("/cart/update", &json!({ "mealId": "m1", "quantity": 0 }))
            .await,
    )
    .await;
    assert_eq!(body["data"]["cart"]["totalItems"], 4);
}

#[tokio::test]
async fn test_removing_last_item_clears_provider() {
    let app = TestApp::spawn().await;
    add(&app, "m1").await;

    let body = json_body(app.post("/cart/remove", &json!({ "mealId": "m1" })).await).await;

    assert_eq!(body["data"]["notice"], "Item removed from cart");
    assert_eq!(body["data"]["cart"]["totalItems"], 0);
    assert!(body["data"]["cart"]["providerId"].is_null());
}

#[tokio::test]
async fn test_clear() {
    let app = TestApp::spawn().await;
    add(&app, "m1").await;
    add(&app, "m2").await;

    let body = json_body(app.post("/cart/clear", &json!({})).await).await;

    assert_eq!(body["data"]["notice"], "Cart cleared");
    assert_eq!(body["data"]["cart"]["totalItems"], 0);
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let app = TestApp::spawn().await;
    add(&app, "m1").await;

    let stranger = reqwest::get(app.at("/cart")).await.unwrap();
    let body = json_body(stranger).await;

    assert_eq!(body["data"]["totalItems"], 0);
}
