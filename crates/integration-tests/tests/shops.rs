//! Shop CRUD, ownership, and proximity search over HTTP.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::Value;

use nearshop_integration_tests::{TestApp, shop_payload};

async fn create(app: &TestApp, token: &str, name: &str, latitude: f64, longitude: f64) -> i64 {
    let response = app
        .create_shop(token, &shop_payload(name, latitude, longitude))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let shop: Value = response.json().await.unwrap();
    shop["id"].as_i64().unwrap()
}

async fn get_json(app: &TestApp, path: &str) -> (StatusCode, Value) {
    let response = app.client.get(app.url(path)).send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

fn names(shops: &Value) -> Vec<&str> {
    shops
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_public_reads() {
    let app = TestApp::spawn().await;
    let token = app.vendor_token("v@e.com").await;
    let id = create(&app, &token, "S", 40.7128, -74.006).await;

    let (status, shop) = get_json(&app, &format!("/shops/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shop["latitude"], 40.7128);
    assert_eq!(shop["longitude"], -74.006);

    let (status, list) = get_json(&app, "/shops/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&list), ["S"]);
}

#[tokio::test]
async fn test_only_owner_can_update() {
    let app = TestApp::spawn().await;
    let owner = app.vendor_token("owner@e.com").await;
    let other = app.vendor_token("other@e.com").await;
    let id = create(&app, &owner, "S", 1.0, 1.0).await;
    let url = app.url(&format!("/shops/{id}"));

    let response = app
        .client
        .put(&url)
        .bearer_auth(&other)
        .json(&shop_payload("Hijacked", 1.0, 1.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .put(&url)
        .json(&shop_payload("Anonymous", 1.0, 1.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .put(&url)
        .bearer_auth(&owner)
        .json(&shop_payload("Renamed", 2.0, 2.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, shop) = get_json(&app, &format!("/shops/{id}")).await;
    assert_eq!(shop["name"], "Renamed");
}

#[tokio::test]
async fn test_delete_missing_shop_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.vendor_token("v@e.com").await;

    let response = app
        .client
        .delete(app.url("/shops/12345"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nearby_radius_boundaries() {
    let app = TestApp::spawn().await;
    let token = app.vendor_token("v@e.com").await;
    create(&app, &token, "NYC", 40.7128, -74.006).await;

    let (status, hits) = get_json(
        &app,
        "/shops/nearby/?latitude=40.7128&longitude=-74.006&radius=1.0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&hits), ["NYC"]);

    // ~50 km north of the shop.
    let (status, misses) = get_json(
        &app,
        "/shops/nearby/?latitude=41.1628&longitude=-74.006&radius=0.01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(names(&misses).is_empty());

    let (_, wide) = get_json(
        &app,
        "/shops/nearby/?latitude=41.1628&longitude=-74.006&radius=60",
    )
    .await;
    assert_eq!(names(&wide), ["NYC"]);
}

#[tokio::test]
async fn test_nearby_orders_by_distance() {
    let app = TestApp::spawn().await;
    let token = app.vendor_token("v@e.com").await;
    create(&app, &token, "Far", 0.3, 0.0).await;
    create(&app, &token, "Near", 0.1, 0.0).await;
    create(&app, &token, "Mid", 0.2, 0.0).await;

    let (_, all) = get_json(&app, "/shops/nearby?lat=0&lon=0&radius=100").await;
    assert_eq!(names(&all), ["Near", "Mid", "Far"]);

    let (_, page) = get_json(&app, "/shops/nearby?lat=0&lon=0&radius=100&skip=1&limit=1").await;
    assert_eq!(names(&page), ["Mid"]);
}

#[tokio::test]
async fn test_nearby_rejects_bad_input() {
    let app = TestApp::spawn().await;

    for path in [
        "/shops/nearby",
        "/shops/nearby?latitude=-91&longitude=0",
        "/shops/nearby?latitude=0&longitude=0&radius=-0.5",
    ] {
        let (status, body) = get_json(&app, path).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{path}");
        assert!(body["detail"].is_string());
    }
}
