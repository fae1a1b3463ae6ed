// handlers/public/auth.rs - Session acquisition and release
//
// Successful login and registration set the session cookie and also return
// the token in the body for API clients that send it as a Bearer header.

use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::access::classify::LOGIN_PATH;
use crate::access::role_home;
use crate::auth::password::{hash_password, validate_email_format, validate_password_strength, verify_password};
use crate::database::models::{normalize_email, NewUser, User};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
    /// Where a browser should go next
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub redirect: String,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/auth/login - Verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let email = normalize_email(&payload.email);
    let Some(user) = state.store().find_user_by_email(&email).await? else {
        tracing::warn!("Login attempt for unknown email {}", email);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        tracing::error!("Stored password hash for {} is unreadable: {}", user.id, e);
        ApiError::internal_server_error("Unable to verify credentials")
    })?;
    if !valid {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    tracing::info!("User {} signed in", user.id);
    start_session(&state, user, ApiResponse::success)
}

/// POST /api/auth/register - Create a trainer account and sign it in.
///
/// Members are never self-registered; trainers create them.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    validate_email_format(payload.email.trim()).map_err(ApiError::bad_request)?;
    validate_password_strength(&payload.password).map_err(ApiError::bad_request)?;

    let password_hash = hash_password(&payload.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to store credentials")
    })?;

    let user = state
        .store()
        .insert_user(NewUser::new(&payload.email, &payload.name, Role::Pt, password_hash))
        .await?;

    tracing::info!("Trainer {} registered", user.id);
    start_session(&state, user, ApiResponse::created)
}

/// POST /api/auth/logout - Drop the session cookie
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, state.sessions.revoke_cookie())]),
        ApiResponse::success(LogoutResponse {
            redirect: LOGIN_PATH.to_string(),
        }),
    )
}

fn start_session(
    state: &AppState,
    user: User,
    respond: fn(SessionResponse) -> ApiResponse<SessionResponse>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = user.identity();
    let token = state.sessions.create_credential(&identity)?;
    let cookie = state.sessions.session_cookie(&token);

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        respond(SessionResponse {
            redirect: role_home(&identity),
            user,
            token,
        }),
    ))
}
