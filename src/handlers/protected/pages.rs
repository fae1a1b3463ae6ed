// handlers/protected/pages.rs - Trainer and member page data
//
// /pt and /pt/* are trainer pages (members were redirected by the policy).
// /member/:id is the member's own page, also viewable by trainers.

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentIdentity};
use crate::scope::{MemberDetail, Scopes};
use crate::state::AppState;

/// GET /pt - Trainer dashboard
pub async fn pt_home(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> ApiResult<Value> {
    let scopes = Scopes::new(&identity, state.store());
    let members = scopes.members()?.list().await?;
    let exercises = scopes.exercises().list().await?;
    let programs = scopes.programs().list().await?;

    let own_exercises = exercises.iter().filter(|e| !e.is_catalog()).count();
    let assigned = programs.iter().filter(|p| p.assigned_to_id.is_some()).count();

    Ok(ApiResponse::success(json!({
        "page": "pt",
        "trainer": identity.email,
        "counts": {
            "members": members.len(),
            "exercises": exercises.len(),
            "own_exercises": own_exercises,
            "programs": programs.len(),
            "assigned_programs": assigned,
        }
    })))
}

/// GET /pt/members
pub async fn pt_members(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> ApiResult<Value> {
    let members = Scopes::new(&identity, state.store()).members()?.list().await?;
    Ok(ApiResponse::success(json!({ "page": "pt/members", "members": members })))
}

/// GET /pt/exercises
pub async fn pt_exercises(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> ApiResult<Value> {
    let exercises = Scopes::new(&identity, state.store()).exercises().list().await?;
    Ok(ApiResponse::success(json!({ "page": "pt/exercises", "exercises": exercises })))
}

/// GET /pt/programs
pub async fn pt_programs(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> ApiResult<Value> {
    let programs = Scopes::new(&identity, state.store()).programs().list().await?;
    Ok(ApiResponse::success(json!({ "page": "pt/programs", "programs": programs })))
}

/// GET /member/:id - A member's profile and assigned programs
pub async fn member_page(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> ApiResult<MemberDetail> {
    let id = parse_id(&id, "Member")?;
    let detail = Scopes::new(&identity, state.store()).profile().member_page(id).await?;
    Ok(ApiResponse::success(detail))
}
