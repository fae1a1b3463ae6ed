use uuid::Uuid;

use super::{require_pt, ScopeError, ScopeResult};
use crate::database::models::{Exercise, ExerciseInput};
use crate::database::Store;
use crate::types::Identity;

/// Exercise library as seen by one caller: their own rows plus the catalog
pub struct ExerciseScope<'a> {
    identity: &'a Identity,
    store: &'a dyn Store,
}

impl<'a> ExerciseScope<'a> {
    pub fn new(identity: &'a Identity, store: &'a dyn Store) -> Self {
        Self { identity, store }
    }

    fn owns(&self, exercise: &Exercise) -> bool {
        exercise.created_by_id == Some(self.identity.user_id)
    }

    pub async fn list(&self) -> ScopeResult<Vec<Exercise>> {
        Ok(self.store.list_visible_exercises(self.identity.user_id).await?)
    }

    pub async fn get(&self, id: Uuid) -> ScopeResult<Exercise> {
        let exercise = self
            .store
            .find_exercise(id)
            .await?
            .ok_or(ScopeError::NotFound("Exercise"))?;

        if exercise.is_catalog() || self.owns(&exercise) {
            Ok(exercise)
        } else {
            Err(ScopeError::forbidden("Exercise belongs to another trainer"))
        }
    }

    pub async fn create(&self, input: ExerciseInput) -> ScopeResult<Exercise> {
        require_pt(self.identity, "create exercises")?;
        input.validate().map_err(ScopeError::Invalid)?;

        let exercise = self
            .store
            .insert_exercise(Some(self.identity.user_id), input)
            .await?;
        tracing::debug!("Exercise {} created by {}", exercise.id, self.identity.user_id);
        Ok(exercise)
    }

    pub async fn update(&self, id: Uuid, input: ExerciseInput) -> ScopeResult<Exercise> {
        require_pt(self.identity, "edit exercises")?;
        input.validate().map_err(ScopeError::Invalid)?;
        self.ensure_owned(id).await?;

        self.store
            .update_exercise(id, Some(self.identity.user_id), input)
            .await?
            .ok_or(ScopeError::NotFound("Exercise"))
    }

    pub async fn delete(&self, id: Uuid) -> ScopeResult<()> {
        require_pt(self.identity, "delete exercises")?;
        self.ensure_owned(id).await?;

        if self.store.delete_exercise(id, self.identity.user_id).await? {
            tracing::debug!("Exercise {} deleted by {}", id, self.identity.user_id);
            Ok(())
        } else {
            Err(ScopeError::NotFound("Exercise"))
        }
    }

    /// Every id must name an exercise this caller can read
    pub async fn ensure_visible(&self, ids: impl IntoIterator<Item = Uuid>) -> ScopeResult<()> {
        for id in ids {
            match self.get(id).await {
                Ok(_) => {}
                Err(ScopeError::NotFound(_)) | Err(ScopeError::Forbidden(_)) => {
                    return Err(ScopeError::invalid(format!("Unknown exercise {}", id)));
                }
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    async fn ensure_owned(&self, id: Uuid) -> ScopeResult<()> {
        let exercise = self
            .store
            .find_exercise(id)
            .await?
            .ok_or(ScopeError::NotFound("Exercise"))?;

        if exercise.is_catalog() {
            return Err(ScopeError::forbidden("Catalog exercises are read-only"));
        }
        if !self.owns(&exercise) {
            tracing::warn!(
                "Trainer {} attempted to modify exercise {} owned by another trainer",
                self.identity.user_id,
                id
            );
            return Err(ScopeError::forbidden("Exercise belongs to another trainer"));
        }
        Ok(())
    }
}
