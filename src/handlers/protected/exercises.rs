// handlers/protected/exercises.rs - Exercise library
//
// GET    /api/exercises       own exercises plus the shared catalog
// POST   /api/exercises       create (trainers)
// GET    /api/exercises/:id   404 missing, 403 another trainer's
// PUT    /api/exercises/:id   update own (catalog rows are read-only)
// DELETE /api/exercises/:id   delete own

use axum::{
    extract::{Path, State},
    Json,
};

use crate::handlers::parse_id;
use crate::database::models::{Exercise, ExerciseInput};
use crate::middleware::{ApiResponse, ApiResult, CurrentIdentity};
use crate::scope::Scopes;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> ApiResult<Vec<Exercise>> {
    let exercises = Scopes::new(&identity, state.store()).exercises().list().await?;
    Ok(ApiResponse::success(exercises))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(input): Json<ExerciseInput>,
) -> ApiResult<Exercise> {
    let exercise = Scopes::new(&identity, state.store()).exercises().create(input).await?;
    Ok(ApiResponse::created(exercise))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> ApiResult<Exercise> {
    let id = parse_id(&id, "Exercise")?;
    let exercise = Scopes::new(&identity, state.store()).exercises().get(id).await?;
    Ok(ApiResponse::success(exercise))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
    Json(input): Json<ExerciseInput>,
) -> ApiResult<Exercise> {
    let id = parse_id(&id, "Exercise")?;
    let exercise = Scopes::new(&identity, state.store()).exercises().update(id, input).await?;
    Ok(ApiResponse::success(exercise))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "Exercise")?;
    Scopes::new(&identity, state.store()).exercises().delete(id).await?;
    Ok(ApiResponse::no_content())
}
