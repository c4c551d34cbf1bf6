//! Account, partner profile and menu management tests.

#![allow(clippy::unwrap_used)]

use foodhub_core::Role;
use foodhub_integration_tests::{
    ADMIN_TOKEN, CUSTOMER_ID, CUSTOMER_TOKEN, PROVIDER_TOKEN, TestApp, decimal, json_body,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn restaurant(name: &str) -> Value {
    json!({
        "name": name,
        "address": "Road 27, Banani",
        "description": "Charcoal grills",
        "logo": "https://img.test/logo.png"
    })
}

fn meal(name: &str, price: &str) -> Value {
    json!({ "categoryId": "c1", "name": name, "price": price })
}

#[tokio::test]
async fn test_update_own_profile() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);

    let response = app
        .post(
            "/account/profile",
            &json!({ "name": " Karim Uddin ", "phone": "01700000000", "image": "" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["name"], "Karim Uddin");

    let account = json_body(app.get("/account").await).await;
    assert_eq!(account["data"]["name"], "Karim Uddin");
    assert_eq!(account["data"]["phone"], "01700000000");
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);

    let response = app
        .post(
            "/account/profile",
            &json!({ "name": "  ", "phone": "", "image": "" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Please enter your name.");
    let data = app.backend.data();
    let customer = data.users.iter().find(|u| u.id.as_str() == CUSTOMER_ID).unwrap();
    assert_eq!(customer.name, "Karim");
}

#[tokio::test]
async fn test_customer_becomes_partner() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);

    let response = app.post("/become-partner", &restaurant("Karim's Grill")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["name"], "Karim's Grill");
    assert_eq!(body["data"]["address"], "Road 27, Banani");

    {
        let data = app.backend.data();
        let customer = data.users.iter().find(|u| u.id.as_str() == CUSTOMER_ID).unwrap();
        assert_eq!(customer.role, Role::Provider);
    }

    let dashboard = json_body(app.get("/dashboard").await).await;
    assert_eq!(dashboard["data"]["role"], "PROVIDER");
    assert_eq!(dashboard["data"]["profile"]["name"], "Karim's Grill");
}

#[tokio::test]
async fn test_partner_cannot_apply_twice() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);

    let response = app.post("/become-partner", &restaurant("Second Kitchen")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "You already have a partner profile.");
    assert_eq!(app.backend.data().providers.len(), 2);
}

#[tokio::test]
async fn test_provider_without_profile_becomes_partner() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);
    for user in &mut app.backend.data().users {
        if user.role == Role::Provider {
            user.provider_profile = None;
        }
    }

    let blocked = app.post("/partner/meals", &meal("Shami Kabab", "120")).await;
    assert_eq!(blocked.status(), StatusCode::NOT_FOUND);
    let body = json_body(blocked).await;
    assert_eq!(body["error"]["message"], "Create your partner profile first.");

    let created = app.post("/become-partner", &restaurant("Rahim's Kitchen")).await;
    assert_eq!(created.status(), StatusCode::OK);
    let provider_id = json_body(created).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let added = app.post("/partner/meals", &meal("Shami Kabab", "120")).await;
    assert_eq!(added.status(), StatusCode::OK);
    assert_eq!(json_body(added).await["data"]["providerId"], provider_id);
}

#[tokio::test]
async fn test_blank_restaurant_address_is_rejected() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);

    let response = app
        .post(
            "/become-partner",
            &json!({ "name": "Grill", "address": " ", "description": "", "logo": "" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.backend.data().providers.len(), 2);
}

#[tokio::test]
async fn test_provider_updates_restaurant_profile() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);
    // Warm the provider cache
    app.get("/providers/p1").await;

    let response = app.post("/partner/profile", &restaurant("Star Kabab & Grill")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["id"], "p1");

    let detail = json_body(app.get("/providers/p1").await).await;
    assert_eq!(detail["data"]["name"], "Star Kabab & Grill");
}

#[tokio::test]
async fn test_customer_cannot_manage_menu() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);

    let response = app.post("/partner/meals", &meal("Shami Kabab", "120")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.backend.data().meals.len(), 4);
}

#[tokio::test]
async fn test_provider_adds_meal_to_own_menu() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);

    let response = app.post("/partner/meals", &meal(" Shami Kabab ", "120")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["providerId"], "p1");
    assert_eq!(body["data"]["name"], "Shami Kabab");
    assert_eq!(body["data"]["isAvailable"], true);

    let data = app.backend.data();
    let added = data.meals.iter().find(|m| m.name == "Shami Kabab").unwrap();
    assert_eq!(added.price, Decimal::new(120, 0));
}

#[tokio::test]
async fn test_zero_price_never_reaches_api() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);

    let response = app.post("/partner/meals", &meal("Free Salad", "0")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Price must be greater than zero.");
    assert_eq!(app.backend.data().meals.len(), 4);
}

#[tokio::test]
async fn test_provider_edits_own_meal() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);

    let response = app
        .post(
            "/partner/meals/m2",
            &json!({ "categoryId": "c1", "name": "Borhani", "price": "70", "isAvailable": false }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(decimal(&body["data"]["price"]), Decimal::new(70, 0));

    let detail = json_body(app.get("/meals/m2").await).await;
    assert_eq!(detail["data"]["isAvailable"], false);
}

#[tokio::test]
async fn test_provider_cannot_edit_another_menu() {
    let app = TestApp::spawn().await;
    app.sign_in(PROVIDER_TOKEN);

    let response = app.post("/partner/meals/m3", &meal("Margherita", "1")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(
        body["error"]["message"],
        "You can only edit meals on your own menu."
    );
    let data = app.backend.data();
    let margherita = data.meals.iter().find(|m| m.id.as_str() == "m3").unwrap();
    assert_eq!(margherita.price, Decimal::new(500, 0));
}

#[tokio::test]
async fn test_admin_views_user() {
    let app = TestApp::spawn().await;
    app.sign_in(ADMIN_TOKEN);

    let body = json_body(app.get(&format!("/admin/users/{CUSTOMER_ID}")).await).await;
    assert_eq!(body["data"]["name"], "Karim");
    assert_eq!(body["data"]["role"], "CUSTOMER");

    let missing = app.get("/admin/users/u-nobody").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_admins_view_users() {
    let app = TestApp::spawn().await;
    app.sign_in(CUSTOMER_TOKEN);

    let response = app.get("/admin/users/u-admin").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
