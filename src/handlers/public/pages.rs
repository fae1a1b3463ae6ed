// handlers/public/pages.rs - Public page data
//
// Pages are served as JSON page data; rendering is the client's concern.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::access::role_home;
use crate::middleware::{ApiResponse, MaybeIdentity};
use crate::state::AppState;

/// GET / - Service landing data
pub async fn home(MaybeIdentity(identity): MaybeIdentity) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "FitCoach API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Coaching backend for personal trainers and their members",
        "signed_in_as": identity.as_ref().map(|i| i.email.clone()),
        "home": identity.as_ref().map(role_home),
        "endpoints": {
            "public": "/, /about, /contact, /login, /register, /health",
            "auth": "/api/auth/login, /api/auth/register, /api/auth/logout (public), /api/auth/whoami",
            "trainer_pages": "/pt, /pt/members, /pt/exercises, /pt/programs",
            "member_pages": "/member/:id",
            "exercises": "/api/exercises[/:id]",
            "programs": "/api/programs[/:id]",
            "members": "/api/members[/:id] (trainers only)",
        }
    }))
}

/// GET /about
pub async fn about() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "about",
        "title": "About FitCoach",
        "summary": "Trainers build exercise libraries and programs; members follow the programs assigned to them."
    }))
}

/// GET /contact
pub async fn contact() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "contact",
        "title": "Contact",
        "email": "hello@fitcoach.example"
    }))
}

/// GET /login - Form description for the sign-in page
pub async fn login_page() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "login",
        "action": "/api/auth/login",
        "fields": ["email", "password"]
    }))
}

/// GET /register - Trainer sign-up form
pub async fn register_page() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "register",
        "action": "/api/auth/register",
        "fields": ["email", "name", "password"]
    }))
}

/// GET /health - Liveness plus a store round-trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
