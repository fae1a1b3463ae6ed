// database/store.rs - Persistence accessors
//
// Every query over an owned resource takes the owner explicitly; only
// single-row lookups by primary key are unscoped, and those are consumed by
// the scope layer, which decides whether the row may leave it.

use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Exercise, ExerciseInput, NewUser, ProgramFilter, ProgramInput, User, WorkoutProgram};
use crate::types::Role;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Fails with `DatabaseError::Conflict` when the email is taken
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatabaseError>;
}

#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Rows owned by `owner` plus the shared catalog
    async fn list_visible_exercises(&self, owner: Uuid) -> Result<Vec<Exercise>, DatabaseError>;

    async fn list_catalog_exercises(&self) -> Result<Vec<Exercise>, DatabaseError>;

    async fn find_exercise(&self, id: Uuid) -> Result<Option<Exercise>, DatabaseError>;

    /// `owner = None` inserts a catalog row
    async fn insert_exercise(&self, owner: Option<Uuid>, input: ExerciseInput) -> Result<Exercise, DatabaseError>;

    /// Updates only when the row belongs to `owner` (`None` = catalog)
    async fn update_exercise(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        input: ExerciseInput,
    ) -> Result<Option<Exercise>, DatabaseError>;

    async fn delete_exercise(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait ProgramStore: Send + Sync {
    async fn list_programs(&self, filter: ProgramFilter) -> Result<Vec<WorkoutProgram>, DatabaseError>;

    async fn find_program(&self, id: Uuid) -> Result<Option<WorkoutProgram>, DatabaseError>;

    async fn insert_program(&self, owner: Uuid, input: ProgramInput) -> Result<WorkoutProgram, DatabaseError>;

    async fn update_program(
        &self,
        id: Uuid,
        owner: Uuid,
        input: ProgramInput,
    ) -> Result<Option<WorkoutProgram>, DatabaseError>;

    async fn delete_program(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError>;
}

/// Everything the service needs from persistence
#[async_trait]
pub trait Store: UserStore + ExerciseStore + ProgramStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
