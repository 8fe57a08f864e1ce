//! Shared fixtures for the integration tests: an in-process test client
//! that carries cookies across requests, a stub completion service, and an
//! app builder wired to an in-memory SQLite database.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use deepchat_core::completion::CompletionOutcome;
use deepchat_core::ports::CompletionService;
use deepchat_core::validate::ValidatedPrompt;
use web_lib::adapters::db::DbAdapter;
use web_lib::config::Config;
use web_lib::web::state::{load_templates, AppState};
use web_lib::web::build_router;

//=========================================================================================
// Stub Completion Service
//=========================================================================================

/// A `CompletionService` that returns a fixed outcome and counts calls, so
/// tests can assert the client was (or was not) reached.
pub struct StubCompletion {
    outcome: CompletionOutcome,
    calls: AtomicUsize,
}

impl StubCompletion {
    pub fn new(outcome: CompletionOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, _prompt: &ValidatedPrompt) -> CompletionOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// The stub outcome the original deployment's tests kept seeing from the
/// unfunded API account.
pub fn insufficient_balance() -> CompletionOutcome {
    CompletionOutcome::ApiError {
        status: 402,
        message: "Insufficient Balance".to_string(),
    }
}

//=========================================================================================
// App Fixture
//=========================================================================================

pub struct TestApp {
    pub router: Router,
    pub db: DbAdapter,
    pub completion: Arc<StubCompletion>,
    pub pool: SqlitePool,
}

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        secret_key: "test-secret".to_string(),
        deepseek_api_key: "test-api-key".to_string(),
        completion_endpoint: "http://localhost:9/v1/chat/completions".to_string(),
        completion_model: "deepseek-chat".to_string(),
        request_timeout: Duration::from_secs(30),
        rate_limit: "5 per minute".parse().unwrap(),
        log_level: tracing::Level::INFO,
    }
}

pub async fn test_pool() -> SqlitePool {
    // One connection keeps the in-memory database alive and shared.
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database")
}

pub async fn spawn_app_with(outcome: CompletionOutcome) -> TestApp {
    let pool = test_pool().await;
    let db = DbAdapter::new(pool.clone());
    db.run_migrations().await.expect("migrations failed");

    let completion = Arc::new(StubCompletion::new(outcome));
    let state = Arc::new(AppState {
        credentials: Arc::new(db.clone()),
        sessions: Arc::new(db.clone()),
        conversations: Arc::new(db.clone()),
        completion: completion.clone(),
        tera: load_templates().expect("template load failed"),
        config: Arc::new(test_config()),
    });

    TestApp {
        router: build_router(state),
        db,
        completion,
        pool,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(insufficient_balance()).await
}

//=========================================================================================
// Cookie-Carrying Test Client
//=========================================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

/// Drives the router through `tower::ServiceExt::oneshot`, carrying cookies
/// between requests like a browser would.
pub struct TestClient {
    router: Router,
    cookies: BTreeMap<String, String>,
    pub user_agent: String,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookies: BTreeMap::new(),
            user_agent: "TestClient/1.0".to_string(),
        }
    }

    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    fn store_cookies(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let Some(pair) = raw.split(';').next() else { continue };
            let Some((name, value)) = pair.split_once('=') else { continue };
            let removed = value.is_empty()
                || raw
                    .split(';')
                    .any(|attr| attr.trim().eq_ignore_ascii_case("Max-Age=0"));
            if removed {
                self.cookies.remove(name.trim());
            } else {
                self.cookies.insert(name.trim().to_string(), value.to_string());
            }
        }
    }

    async fn send(&mut self, method: Method, path: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::USER_AGENT, &self.user_agent);
        if let Some(cookie) = self.cookie_header() {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let (parts, body) = response.into_parts();
        self.store_cookies(&parts.headers);
        let bytes = body.collect().await.expect("body read failed").to_bytes();
        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, path, Some(encode_form(fields))).await
    }

    /// Like a browser with redirects: issues the request, then follows
    /// Location headers with GETs until a non-redirect lands.
    pub async fn follow(&mut self, mut response: TestResponse) -> TestResponse {
        while response.status.is_redirection() {
            let location = response
                .location()
                .expect("redirect without Location header")
                .to_string();
            response = self.get(&location).await;
        }
        response
    }

    pub async fn get_followed(&mut self, path: &str) -> TestResponse {
        let response = self.get(path).await;
        self.follow(response).await
    }

    pub async fn post_followed(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let response = self.post(path, fields).await;
        self.follow(response).await
    }

    //--- Auth helpers, mirroring the flows the auth tests repeat ---

    pub async fn register(&mut self, username: &str, password: &str) -> TestResponse {
        self.post("/register", &[("username", username), ("password", password)])
            .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post("/login", &[("username", username), ("password", password)])
            .await
    }

    pub async fn logout(&mut self) -> TestResponse {
        self.get("/logout").await
    }
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| {
            format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
        })
        .collect::<Vec<_>>()
        .join("&")
}

//=========================================================================================
// Database Probes
//=========================================================================================

pub async fn user_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn chat_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM chats")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn stored_password_hash(pool: &SqlitePool, username: &str) -> String {
    sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}
