//! Vendor registration and authentication over HTTP.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};

use nearshop_integration_tests::TestApp;

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::spawn().await;

    assert_eq!(app.register("First", "dup@e.com", "pw1").await.status(), StatusCode::OK);

    let response = app.register("Second", "dup@e.com", "pw2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "detail": "Email already registered" }));

    // The first registration still owns the email.
    assert_eq!(app.login("dup@e.com", "pw1").await.status(), StatusCode::OK);
    assert_eq!(
        app.login("dup@e.com", "pw2").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_email_is_case_insensitive() {
    let app = TestApp::spawn().await;

    assert_eq!(app.register("V", "Mixed@E.com", "pw").await.status(), StatusCode::OK);
    assert_eq!(
        app.register("V", "mixed@e.com", "pw").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(app.login("MIXED@e.COM", "pw").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_registration_is_unprocessable() {
    let app = TestApp::spawn().await;

    for (name, email, password) in [("", "v@e.com", "pw"), ("V", "v-at-e.com", "pw"), ("V", "v@e.com", "")] {
        let response = app.register(name, email, password).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "{name:?} {email:?} {password:?}"
        );
    }
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = TestApp::spawn().await;
    app.register("V", "v@e.com", "pw").await;

    let wrong_password = app.login("v@e.com", "nope").await;
    let unknown_email = app.login("ghost@e.com", "pw").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.headers()["www-authenticate"], "Bearer");

    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_email.json().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_me_with_valid_and_invalid_tokens() {
    let app = TestApp::spawn().await;
    let token = app.vendor_token("v@e.com").await;

    let response = app
        .client
        .get(app.url("/vendors/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["email"], "v@e.com");
    assert!(me.get("hashed_password").is_none());

    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    for header in [
        format!("Bearer {tampered}"),
        "Bearer not-a-token".to_string(),
        format!("Basic {token}"),
        "Bearer".to_string(),
    ] {
        let response = app
            .client
            .get(app.url("/vendors/me"))
            .header("authorization", header.as_str())
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{header}");
        assert_eq!(response.headers()["www-authenticate"], "Bearer");
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::spawn().await;
    app.register("V", "v@e.com", "pw").await;

    let issued_long_ago = Utc::now() - Duration::hours(2);
    let token = app.state.tokens().issue("v@e.com", issued_long_ago).unwrap();

    let response = app
        .client
        .get(app.url("/vendors/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unregistered_subject_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.state.tokens().issue("ghost@e.com", Utc::now()).unwrap();

    let response = app
        .client
        .get(app.url("/vendors/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
