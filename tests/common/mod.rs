#![allow(dead_code)]

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use coffee_shop_api::app::{app, AppState};
use coffee_shop_api::auth::{KeySource, TokenVerifier};
use coffee_shop_api::config::{DatabaseConfig, SecurityConfig};
use coffee_shop_api::database::{DatabaseManager, DrinkRepository};

pub const SECRET: &str = "integration-secret";
pub const ISSUER: &str = "https://coffee.test/";
pub const AUDIENCE: &str = "drinks";

pub const ALL_PERMISSIONS: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Start a server on a free port backed by its own in-memory database
pub async fn spawn_server() -> Result<TestServer> {
    let pool = DatabaseManager::connect(&DatabaseConfig::in_memory()).await?;
    DatabaseManager::ensure_schema(&pool).await?;

    let verifier = TokenVerifier::new(ISSUER, AUDIENCE, KeySource::Secret(SECRET.to_string()));
    let state = AppState::new(DrinkRepository::new(pool), verifier);
    let security = SecurityConfig {
        enable_cors: true,
        cors_origins: vec!["*".to_string()],
    };
    let router = app(state, &security);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        _handle: handle,
    })
}

pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "sub": "auth0|integration",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "iat": Utc::now().timestamp(),
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        "permissions": permissions,
    })
}

pub fn sign(claims: &Value, secret: &str) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("token encoding")
}

/// A valid `Authorization` header value carrying `permissions`
pub fn bearer(permissions: &[&str]) -> String {
    format!("Bearer {}", sign(&claims(permissions), SECRET))
}
