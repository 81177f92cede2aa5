use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use reqgate::auth::password;
use reqgate::config::Config;
use reqgate::db;
use reqgate::models::Role;

/// A running test server instance backed by an in-memory database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Insert a user directly, the way the startup bootstrap would.
    pub async fn seed_user(&self, external_id: &str, pw: &str, role: Role, name: &str) {
        let hash = password::hash(pw).expect("hash failed");
        db::users::create(&self.pool, external_id, Some(name), &hash, role, Some("test"))
            .await
            .expect("seed user failed");
    }

    /// Seed the three standard actors, return (admin, approver, requester) tokens.
    pub async fn seed_actors(&self) -> (String, String, String) {
        self.seed_user("admin123", "password123", Role::Admin, "Admin User")
            .await;
        self.seed_user("appr001", "password123", Role::Approver, "Level Two")
            .await;
        self.seed_user("req001", "password123", Role::Requester, "Field User")
            .await;
        (
            self.token("admin123").await,
            self.token("appr001").await,
            self.token("req001").await,
        )
    }

    pub async fn login(&self, external_id: &str, pw: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "externalId": external_id, "password": pw }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Login with the seeded password, return the access token.
    pub async fn token(&self, external_id: &str) -> String {
        let (body, status) = self.login(external_id, "password123").await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    /// Submit a requisition, return (body, status).
    pub async fn submit_requisition(&self, token: &str, body: &Value) -> (Value, StatusCode) {
        self.post_auth("/api/v1/requisitions", token, body).await
    }

    /// A submission body that passes mandatory-field validation.
    pub fn valid_submission(basin: &str) -> Value {
        json!({
            "requisitionDate": "2026-08-01",
            "basin": basin,
            "area": "Block 7",
            "dimension": "3D",
            "dataType": "Field tapes",
            "objective": "Velocity modelling",
            "requesterName": "Field User",
            "requesterDesignation": "Geophysicist",
            "requesterCpf": "12345",
            "requesterMobile": "9876543210",
            "requesterGroup": "Processing"
        })
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Spawn a test app on an ephemeral port with a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // A single pinned connection: the in-memory database lives exactly as
    // long as it does.
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to a random port
        allowed_origins: vec!["*".to_string()],
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        bootstrap_admin: None,
    };

    let app = reqgate::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, pool, client }
}
