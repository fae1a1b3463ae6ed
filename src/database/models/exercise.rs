use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub instructions: Option<String>,
    /// `None` for rows of the shared catalog
    pub created_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exercise {
    pub fn is_catalog(&self) -> bool {
        self.created_by_id.is_none()
    }
}

/// Writable exercise fields, as accepted by the API and the catalog importer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseInput {
    pub name: String,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

impl ExerciseInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Exercise name is required".to_string());
        }
        if self.name.chars().count() > 200 {
            return Err("Exercise name must be at most 200 characters".to_string());
        }
        Ok(())
    }
}
