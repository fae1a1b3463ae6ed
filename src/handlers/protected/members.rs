// handlers/protected/members.rs - Member management (trainers only)
//
// The /api/members namespace is already trainer-only in the access policy;
// the directory accessor enforces it again before touching the store.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::handlers::parse_id;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentIdentity};
use crate::scope::member::NewMember;
use crate::scope::{MemberDetail, Scopes};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> ApiResult<Vec<User>> {
    let members = Scopes::new(&identity, state.store()).members()?.list().await?;
    Ok(ApiResponse::success(members))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(input): Json<NewMember>,
) -> ApiResult<User> {
    let member = Scopes::new(&identity, state.store()).members()?.create(input).await?;
    Ok(ApiResponse::created(member))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> ApiResult<MemberDetail> {
    let id = parse_id(&id, "Member")?;
    let detail = Scopes::new(&identity, state.store()).members()?.detail(id).await?;
    Ok(ApiResponse::success(detail))
}
