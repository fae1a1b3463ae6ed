use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramExercise {
    pub exercise_id: Uuid,
    pub sets: u32,
    pub reps: u32,
    #[serde(default)]
    pub rest_seconds: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutProgram {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by_id: Uuid,
    pub assigned_to_id: Option<Uuid>,
    pub exercises: Json<Vec<ProgramExercise>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to_id: Option<Uuid>,
    #[serde(default)]
    pub exercises: Vec<ProgramExercise>,
}

impl ProgramInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Program name is required".to_string());
        }
        for (index, entry) in self.exercises.iter().enumerate() {
            if entry.sets == 0 || entry.reps == 0 {
                return Err(format!("Exercise #{} must have at least one set and one rep", index + 1));
            }
        }
        Ok(())
    }
}

/// Row filter for program listings. Every variant names an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramFilter {
    CreatedBy(Uuid),
    AssignedTo(Uuid),
    CreatedByFor { creator: Uuid, assignee: Uuid },
}

impl ProgramFilter {
    pub fn matches(&self, program: &WorkoutProgram) -> bool {
        match *self {
            ProgramFilter::CreatedBy(creator) => program.created_by_id == creator,
            ProgramFilter::AssignedTo(assignee) => program.assigned_to_id == Some(assignee),
            ProgramFilter::CreatedByFor { creator, assignee } => {
                program.created_by_id == creator && program.assigned_to_id == Some(assignee)
            }
        }
    }
}
