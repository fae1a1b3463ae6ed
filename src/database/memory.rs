use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Exercise, ExerciseInput, NewUser, ProgramFilter, ProgramInput, User, WorkoutProgram};
use super::store::{ExerciseStore, ProgramStore, Store, UserStore};
use crate::types::Role;

/// In-process store for tests and database-less development runs
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    exercises: RwLock<HashMap<Uuid, Exercise>>,
    programs: RwLock<HashMap<Uuid, WorkoutProgram>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_name<T>(mut rows: Vec<T>, name: impl Fn(&T) -> &str) -> Vec<T> {
    rows.sort_by(|a, b| name(a).to_lowercase().cmp(&name(b).to_lowercase()));
    rows
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let email = email.trim().to_lowercase();
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict(format!("email '{}' already registered", user.email)));
        }

        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            role: user.role,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatabaseError> {
        let rows: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |u| u.name.as_str()))
    }
}

#[async_trait]
impl ExerciseStore for MemoryStore {
    async fn list_visible_exercises(&self, owner: Uuid) -> Result<Vec<Exercise>, DatabaseError> {
        let rows: Vec<Exercise> = self
            .exercises
            .read()
            .await
            .values()
            .filter(|e| e.created_by_id.is_none() || e.created_by_id == Some(owner))
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |e| e.name.as_str()))
    }

    async fn list_catalog_exercises(&self) -> Result<Vec<Exercise>, DatabaseError> {
        let rows: Vec<Exercise> = self
            .exercises
            .read()
            .await
            .values()
            .filter(|e| e.is_catalog())
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |e| e.name.as_str()))
    }

    async fn find_exercise(&self, id: Uuid) -> Result<Option<Exercise>, DatabaseError> {
        Ok(self.exercises.read().await.get(&id).cloned())
    }

    async fn insert_exercise(&self, owner: Option<Uuid>, input: ExerciseInput) -> Result<Exercise, DatabaseError> {
        let now = Utc::now();
        let row = Exercise {
            id: Uuid::new_v4(),
            name: input.name,
            muscle_group: input.muscle_group,
            equipment: input.equipment,
            instructions: input.instructions,
            created_by_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.exercises.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_exercise(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        input: ExerciseInput,
    ) -> Result<Option<Exercise>, DatabaseError> {
        let mut exercises = self.exercises.write().await;
        let Some(row) = exercises.get_mut(&id).filter(|e| e.created_by_id == owner) else {
            return Ok(None);
        };

        row.name = input.name;
        row.muscle_group = input.muscle_group;
        row.equipment = input.equipment;
        row.instructions = input.instructions;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_exercise(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let mut exercises = self.exercises.write().await;
        if exercises.get(&id).map(|e| e.created_by_id) == Some(Some(owner)) {
            exercises.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait]
impl ProgramStore for MemoryStore {
    async fn list_programs(&self, filter: ProgramFilter) -> Result<Vec<WorkoutProgram>, DatabaseError> {
        let rows: Vec<WorkoutProgram> = self
            .programs
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |p| p.name.as_str()))
    }

    async fn find_program(&self, id: Uuid) -> Result<Option<WorkoutProgram>, DatabaseError> {
        Ok(self.programs.read().await.get(&id).cloned())
    }

    async fn insert_program(&self, owner: Uuid, input: ProgramInput) -> Result<WorkoutProgram, DatabaseError> {
        let now = Utc::now();
        let row = WorkoutProgram {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            created_by_id: owner,
            assigned_to_id: input.assigned_to_id,
            exercises: Json(input.exercises),
            created_at: now,
            updated_at: now,
        };
        self.programs.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_program(
        &self,
        id: Uuid,
        owner: Uuid,
        input: ProgramInput,
    ) -> Result<Option<WorkoutProgram>, DatabaseError> {
        let mut programs = self.programs.write().await;
        let Some(row) = programs.get_mut(&id).filter(|p| p.created_by_id == owner) else {
            return Ok(None);
        };

        row.name = input.name;
        row.description = input.description;
        row.assigned_to_id = input.assigned_to_id;
        row.exercises = Json(input.exercises);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_program(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let mut programs = self.programs.write().await;
        if programs.get(&id).map(|p| p.created_by_id) == Some(owner) {
            programs.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
