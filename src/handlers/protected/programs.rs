// handlers/protected/programs.rs - Workout programs
//
// Trainers work on the programs they created. Members can only read the
// programs assigned to them; anything else answers 404.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::handlers::parse_id;
use crate::database::models::{ProgramInput, WorkoutProgram};
use crate::middleware::{ApiResponse, ApiResult, CurrentIdentity};
use crate::scope::program::ProgramView;
use crate::scope::Scopes;
use crate::state::AppState;

/// GET /api/programs
pub async fn list(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> ApiResult<Vec<WorkoutProgram>> {
    let programs = Scopes::new(&identity, state.store()).programs().list().await?;
    Ok(ApiResponse::success(programs))
}

/// POST /api/programs
pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(input): Json<ProgramInput>,
) -> ApiResult<WorkoutProgram> {
    let program = Scopes::new(&identity, state.store()).programs().create(input).await?;
    Ok(ApiResponse::created(program))
}

/// GET /api/programs/:id - Program with its exercises expanded
pub async fn get(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> ApiResult<ProgramView> {
    let id = parse_id(&id, "Program")?;
    let view = Scopes::new(&identity, state.store()).programs().view(id).await?;
    Ok(ApiResponse::success(view))
}

/// PUT /api/programs/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
    Json(input): Json<ProgramInput>,
) -> ApiResult<WorkoutProgram> {
    let id = parse_id(&id, "Program")?;
    let program = Scopes::new(&identity, state.store()).programs().update(id, input).await?;
    Ok(ApiResponse::success(program))
}

/// DELETE /api/programs/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "Program")?;
    Scopes::new(&identity, state.store()).programs().delete(id).await?;
    Ok(ApiResponse::no_content())
}
