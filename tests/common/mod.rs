#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use cookie::Cookie;
use serde_json::Value;
use tower::ServiceExt;

use fitcoach_api::auth::SessionManager;
use fitcoach_api::database::models::{ExerciseInput, NewUser};
use fitcoach_api::database::{ExerciseStore, MemoryStore, Store, UserStore};
use fitcoach_api::types::{Identity, Role};
use fitcoach_api::{app, AppState};

pub const COOKIE_NAME: &str = "fitcoach_session";
pub const TEST_SECRET: &str = "integration-test-secret";

/// Router over a fresh in-memory store, driven in-process with `oneshot`
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub sessions: Arc<SessionManager>,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `name=value` part of the Set-Cookie header, ready to send back
    pub fn session_cookie(&self) -> Option<String> {
        let raw = self.headers.get(header::SET_COOKIE)?.to_str().ok()?;
        Cookie::parse(raw).ok().map(|cookie| cookie.stripped().to_string())
    }
}

/// A signed-in test user
pub struct Caller {
    pub identity: Identity,
    pub cookie: String,
}

impl Caller {
    pub fn id(&self) -> String {
        self.identity.user_id.to_string()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::build(store.clone(), store)
    }

    /// Router over an arbitrary `Store`. The seeding helpers (`user`,
    /// `catalog_exercise`) write to a detached in-memory store, so callers
    /// mint sessions with `cookie_for` instead.
    pub fn with_store(backend: Arc<dyn Store>) -> Self {
        Self::build(Arc::new(MemoryStore::new()), backend)
    }

    fn build(store: Arc<MemoryStore>, backend: Arc<dyn Store>) -> Self {
        let sessions = SessionManager::new(TEST_SECRET, 1, COOKIE_NAME, false).expect("session manager");
        let state = AppState::new(backend, sessions);
        let sessions = state.sessions.clone();

        Self {
            store,
            sessions,
            router: app(state),
        }
    }

    /// Insert a user directly and mint a session for it.
    ///
    /// The stored hash is not a real Argon2 hash, so these users cannot log in
    /// with a password; tests that need that go through /api/auth/register.
    pub async fn user(&self, email: &str, role: Role) -> Caller {
        let user = self
            .store
            .insert_user(NewUser::new(email, email, role, "not-a-hash".to_string()))
            .await
            .expect("insert user");
        let identity = user.identity();
        let cookie = self.cookie_for(&identity);
        Caller { identity, cookie }
    }

    pub fn cookie_for(&self, identity: &Identity) -> String {
        let token = self.sessions.create_credential(identity).expect("credential");
        format!("{}={}", COOKIE_NAME, token)
    }

    pub async fn catalog_exercise(&self, name: &str) -> String {
        self.store
            .insert_exercise(None, ExerciseInput::named(name))
            .await
            .expect("insert catalog exercise")
            .id
            .to_string()
    }

    pub async fn get(&self, path: &str, caller: Option<&Caller>) -> TestResponse {
        self.send(Method::GET, path, caller.map(|c| c.cookie.as_str()), None).await
    }

    pub async fn post(&self, path: &str, caller: Option<&Caller>, body: Value) -> TestResponse {
        self.send(Method::POST, path, caller.map(|c| c.cookie.as_str()), Some(body)).await
    }

    pub async fn put(&self, path: &str, caller: Option<&Caller>, body: Value) -> TestResponse {
        self.send(Method::PUT, path, caller.map(|c| c.cookie.as_str()), Some(body)).await
    }

    pub async fn delete(&self, path: &str, caller: Option<&Caller>) -> TestResponse {
        self.send(Method::DELETE, path, caller.map(|c| c.cookie.as_str()), None).await
    }

    pub async fn send(&self, method: Method, path: &str, cookie: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("infallible router");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, headers, body }
    }
}
