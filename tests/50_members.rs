mod common;

use axum::http::StatusCode;
use common::TestApp;
use fitcoach_api::types::Role;
use serde_json::json;

#[tokio::test]
async fn member_directory_is_trainer_only() {
    let app = TestApp::new();
    let member = app.user("m@example.com", Role::Member).await;

    let as_member = app.get("/api/members", Some(&member)).await;
    assert_eq!(as_member.status, StatusCode::FORBIDDEN);
    assert_eq!(as_member.body["code"], "FORBIDDEN");

    let as_member_create = app
        .post(
            "/api/members",
            Some(&member),
            json!({ "email": "friend@example.com", "name": "Friend", "password": "long-enough" }),
        )
        .await;
    assert_eq!(as_member_create.status, StatusCode::FORBIDDEN);

    assert_eq!(app.get("/api/members", None).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn trainer_creates_member_who_can_sign_in() {
    let app = TestApp::new();
    let pt = app.user("pt@example.com", Role::Pt).await;

    let created = app
        .post(
            "/api/members",
            Some(&pt),
            json!({ "email": "Sam@Example.com", "name": "Sam", "password": "squat-every-day" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.data()["role"], "MEMBER");
    let member_id = created.data()["id"].as_str().unwrap().to_string();

    let login = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "sam@example.com", "password": "squat-every-day" }),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.data()["redirect"], format!("/member/{}", member_id));

    let duplicate = app
        .post(
            "/api/members",
            Some(&pt),
            json!({ "email": "sam@example.com", "name": "Sam again", "password": "squat-every-day" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn member_detail_lists_programs_from_this_trainer() {
    let app = TestApp::new();
    let pt1 = app.user("pt1@example.com", Role::Pt).await;
    let pt2 = app.user("pt2@example.com", Role::Pt).await;
    let member = app.user("m@example.com", Role::Member).await;

    for (pt, name) in [(&pt1, "From one"), (&pt2, "From two")] {
        let res = app
            .post("/api/programs", Some(pt), json!({ "name": name, "assigned_to_id": member.id() }))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let detail = app.get(&format!("/api/members/{}", member.id()), Some(&pt1)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.data()["member"]["email"], "m@example.com");
    let programs = detail.data()["programs"].as_array().unwrap();
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0]["name"], "From one");
}

#[tokio::test]
async fn non_members_are_not_found() {
    let app = TestApp::new();
    let pt1 = app.user("pt1@example.com", Role::Pt).await;
    let pt2 = app.user("pt2@example.com", Role::Pt).await;

    assert_eq!(
        app.get(&format!("/api/members/{}", pt2.id()), Some(&pt1)).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.get(&format!("/api/members/{}", uuid::Uuid::new_v4()), Some(&pt1)).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn invalid_member_input_is_unprocessable() {
    let app = TestApp::new();
    let pt = app.user("pt@example.com", Role::Pt).await;

    let res = app
        .post(
            "/api/members",
            Some(&pt),
            json!({ "email": "not-an-email", "name": "Sam", "password": "squat-every-day" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}
