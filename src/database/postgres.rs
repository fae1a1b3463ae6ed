use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Exercise, ExerciseInput, NewUser, ProgramFilter, ProgramInput, User, WorkoutProgram};
use super::store::{ExerciseStore, ProgramStore, Store, UserStore};
use crate::types::Role;

const USER_COLUMNS: &str = "id, email, name, role, password_hash, created_at";
const EXERCISE_COLUMNS: &str =
    "id, name, muscle_group, equipment, instructions, created_by_id, created_at, updated_at";
const PROGRAM_COLUMNS: &str =
    "id, name, description, created_by_id, assigned_to_id, exercises, created_at, updated_at";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, email, name, role, password_hash) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.role.as_str())
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE role = $1 ORDER BY lower(name)", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl ExerciseStore for PgStore {
    async fn list_visible_exercises(&self, owner: Uuid) -> Result<Vec<Exercise>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM exercises WHERE created_by_id = $1 OR created_by_id IS NULL ORDER BY lower(name)",
            EXERCISE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Exercise>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_catalog_exercises(&self) -> Result<Vec<Exercise>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM exercises WHERE created_by_id IS NULL ORDER BY lower(name)",
            EXERCISE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Exercise>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_exercise(&self, id: Uuid) -> Result<Option<Exercise>, DatabaseError> {
        let sql = format!("SELECT {} FROM exercises WHERE id = $1", EXERCISE_COLUMNS);
        Ok(sqlx::query_as::<_, Exercise>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_exercise(&self, owner: Option<Uuid>, input: ExerciseInput) -> Result<Exercise, DatabaseError> {
        let sql = format!(
            "INSERT INTO exercises (id, name, muscle_group, equipment, instructions, created_by_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            EXERCISE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Exercise>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.muscle_group)
            .bind(&input.equipment)
            .bind(&input.instructions)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_exercise(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        input: ExerciseInput,
    ) -> Result<Option<Exercise>, DatabaseError> {
        // IS NOT DISTINCT FROM lets a NULL owner address catalog rows
        let sql = format!(
            "UPDATE exercises SET name = $3, muscle_group = $4, equipment = $5, instructions = $6, updated_at = now() \
             WHERE id = $1 AND created_by_id IS NOT DISTINCT FROM $2 RETURNING {}",
            EXERCISE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Exercise>(&sql)
            .bind(id)
            .bind(owner)
            .bind(&input.name)
            .bind(&input.muscle_group)
            .bind(&input.equipment)
            .bind(&input.instructions)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_exercise(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1 AND created_by_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProgramStore for PgStore {
    async fn list_programs(&self, filter: ProgramFilter) -> Result<Vec<WorkoutProgram>, DatabaseError> {
        let (condition, first, second) = match filter {
            ProgramFilter::CreatedBy(creator) => ("created_by_id = $1", creator, None),
            ProgramFilter::AssignedTo(assignee) => ("assigned_to_id = $1", assignee, None),
            ProgramFilter::CreatedByFor { creator, assignee } => {
                ("created_by_id = $1 AND assigned_to_id = $2", creator, Some(assignee))
            }
        };

        let sql = format!(
            "SELECT {} FROM workout_programs WHERE {} ORDER BY lower(name)",
            PROGRAM_COLUMNS, condition
        );
        let mut query = sqlx::query_as::<_, WorkoutProgram>(&sql).bind(first);
        if let Some(second) = second {
            query = query.bind(second);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn find_program(&self, id: Uuid) -> Result<Option<WorkoutProgram>, DatabaseError> {
        let sql = format!("SELECT {} FROM workout_programs WHERE id = $1", PROGRAM_COLUMNS);
        Ok(sqlx::query_as::<_, WorkoutProgram>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_program(&self, owner: Uuid, input: ProgramInput) -> Result<WorkoutProgram, DatabaseError> {
        let sql = format!(
            "INSERT INTO workout_programs (id, name, description, created_by_id, assigned_to_id, exercises) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            PROGRAM_COLUMNS
        );
        Ok(sqlx::query_as::<_, WorkoutProgram>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.description)
            .bind(owner)
            .bind(input.assigned_to_id)
            .bind(Json(&input.exercises))
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_program(
        &self,
        id: Uuid,
        owner: Uuid,
        input: ProgramInput,
    ) -> Result<Option<WorkoutProgram>, DatabaseError> {
        let sql = format!(
            "UPDATE workout_programs SET name = $3, description = $4, assigned_to_id = $5, exercises = $6, updated_at = now() \
             WHERE id = $1 AND created_by_id = $2 RETURNING {}",
            PROGRAM_COLUMNS
        );
        Ok(sqlx::query_as::<_, WorkoutProgram>(&sql)
            .bind(id)
            .bind(owner)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.assigned_to_id)
            .bind(Json(&input.exercises))
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_program(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM workout_programs WHERE id = $1 AND created_by_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
