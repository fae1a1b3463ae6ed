mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::TestApp;
use fitcoach_api::types::Role;
use serde_json::json;

fn registration(email: &str) -> serde_json::Value {
    json!({ "email": email, "name": "Pat Trainer", "password": "correct-horse" })
}

#[tokio::test]
async fn register_creates_trainer_and_starts_session() {
    let app = TestApp::new();

    let res = app.post("/api/auth/register", None, registration("Pat@Example.com")).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.data()["user"]["role"], "PT");
    assert_eq!(res.data()["user"]["email"], "pat@example.com");
    assert_eq!(res.data()["redirect"], "/pt");
    assert!(res.data()["user"].get("password_hash").is_none());

    let cookie = res.session_cookie().expect("session cookie");
    let set_cookie = res.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));

    let whoami = app.send(Method::GET, "/api/auth/whoami", Some(&cookie), None).await;
    assert_eq!(whoami.status, StatusCode::OK);
    assert_eq!(whoami.data()["identity"]["role"], "PT");
    assert_eq!(whoami.data()["home"], "/pt");
}

#[tokio::test]
async fn register_rejects_duplicates_and_weak_input() {
    let app = TestApp::new();
    assert_eq!(
        app.post("/api/auth/register", None, registration("pat@example.com")).await.status,
        StatusCode::CREATED
    );

    let dup = app.post("/api/auth/register", None, registration("PAT@example.com")).await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.body["code"], "CONFLICT");

    let weak = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "new@example.com", "name": "New", "password": "short" }),
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_registered_password() {
    let app = TestApp::new();
    app.post("/api/auth/register", None, registration("pat@example.com")).await;

    let ok = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "pat@example.com", "password": "correct-horse" }),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.data()["redirect"], "/pt");
    assert!(ok.session_cookie().is_some());

    let bad = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "pat@example.com", "password": "wrong-horse" }),
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);

    let unknown = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "correct-horse" }),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.body["message"], unknown.body["message"]);
}

#[tokio::test]
async fn whoami_requires_a_session() {
    let app = TestApp::new();
    let res = app.get("/api/auth/whoami", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn bearer_token_is_accepted_for_api_clients() {
    let app = TestApp::new();
    let member = app.user("m@example.com", Role::Member).await;
    let token = app.sessions.create_credential(&member.identity).unwrap();

    let request = Request::builder()
        .uri("/api/auth/whoami")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let res = app.dispatch(request).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["identity"]["role"], "MEMBER");
    assert_eq!(res.data()["home"], format!("/member/{}", member.id()));
}

#[tokio::test]
async fn forged_or_orphaned_credentials_are_anonymous() {
    let app = TestApp::new();

    let forged = app
        .send(Method::GET, "/api/auth/whoami", Some("fitcoach_session=not.a.jwt"), None)
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    // Signed correctly, but the user row does not exist
    let ghost = fitcoach_api::types::Identity::new(uuid::Uuid::new_v4(), "ghost@example.com", Role::Pt);
    let cookie = app.cookie_for(&ghost);
    let res = app.send(Method::GET, "/api/auth/whoami", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let page = app.send(Method::GET, "/pt", Some(&cookie), None).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/login"));
}

#[tokio::test]
async fn stale_role_in_credential_is_anonymous() {
    let app = TestApp::new();
    let member = app.user("m@example.com", Role::Member).await;

    // Same user id, but the credential claims trainer rights
    let mut escalated = member.identity.clone();
    escalated.role = Role::Pt;
    let cookie = app.cookie_for(&escalated);

    let res = app.send(Method::GET, "/api/members", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let app = TestApp::new();
    let res = app.post("/api/auth/logout", None, json!({})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["redirect"], "/login");

    let set_cookie = res.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("fitcoach_session="));
    assert!(set_cookie.contains("Max-Age=0"));
}
