//! Black-box HTTP tests for nearshop.
//!
//! Each test spawns the real router on an ephemeral port, backed by a private
//! in-memory SQLite database, and drives it with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nearshop-integration-tests
//! ```

use std::net::SocketAddr;

use axum::{ServiceExt, extract::Request};
use chrono::Duration;
use reqwest::{Client, Response};
use secrecy::SecretString;
use serde_json::{Value, json};

use nearshop_api::AppState;
use nearshop_api::config::{ApiConfig, AuthConfig, PasswordConfig, TokenConfig};
use nearshop_api::db;

/// Signing secret used by every test server.
pub const TEST_SECRET: &str = "k7Qz!pL2#vX9mR4@tY6wB1nE8jH3sD5f";

/// Configuration for a test server: cheap Argon2, 30-minute tokens.
#[must_use]
pub fn test_config() -> ApiConfig {
    ApiConfig {
        database_url: SecretString::from("sqlite::memory:".to_string()),
        host: std::net::Ipv4Addr::LOCALHOST.into(),
        port: 0,
        auth: AuthConfig {
            token: TokenConfig {
                secret: SecretString::from(TEST_SECRET.to_string()),
                ttl: Duration::minutes(30),
            },
            password: PasswordConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
        },
        cors_origins: Vec::new(),
        auto_migrate: true,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A running API server and a client pointed at it.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
}

impl TestApp {
    /// Start a server on `127.0.0.1:0` with a fresh database.
    ///
    /// # Panics
    ///
    /// Panics if the database or listener cannot be set up.
    pub async fn spawn() -> Self {
        let pool = db::create_memory_pool()
            .await
            .expect("Failed to create in-memory database");
        let state = AppState::new(test_config(), pool).expect("Failed to create application state");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = nearshop_api::app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await
        });

        Self {
            addr,
            client: Client::new(),
            state,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `POST /vendors/`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/vendors/"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to send register request")
    }

    /// `POST /vendors/token` with form credentials.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/vendors/token"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .expect("Failed to send token request")
    }

    /// Register a vendor and return a bearer token for it.
    ///
    /// # Panics
    ///
    /// Panics if registration or login fails.
    pub async fn vendor_token(&self, email: &str) -> String {
        let response = self.register("V", email, "pw").await;
        assert!(response.status().is_success(), "register failed: {}", response.status());

        let response = self.login(email, "pw").await;
        assert!(response.status().is_success(), "login failed: {}", response.status());

        let body: Value = response.json().await.expect("Token response is not JSON");
        body["access_token"]
            .as_str()
            .expect("Token response has no access_token")
            .to_string()
    }

    /// `POST /shops/` as the holder of `token`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn create_shop(&self, token: &str, shop: &Value) -> Response {
        self.client
            .post(self.url("/shops/"))
            .bearer_auth(token)
            .json(shop)
            .send()
            .await
            .expect("Failed to send create shop request")
    }
}

/// A `ShopCreate` payload.
#[must_use]
pub fn shop_payload(name: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "name": name,
        "owner": "O",
        "business_type": "Retail",
        "latitude": latitude,
        "longitude": longitude,
    })
}
