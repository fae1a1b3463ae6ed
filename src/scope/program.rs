use serde::Serialize;
use uuid::Uuid;

use super::exercise::ExerciseScope;
use super::{require_pt, ScopeError, ScopeResult};
use crate::database::models::{Exercise, ProgramFilter, ProgramInput, WorkoutProgram};
use crate::database::Store;
use crate::types::{Identity, Role};

/// A program together with the exercises it references
#[derive(Debug, Clone, Serialize)]
pub struct ProgramView {
    #[serde(flatten)]
    pub program: WorkoutProgram,
    pub exercise_details: Vec<Exercise>,
}

/// Workout programs as seen by one caller.
///
/// Trainers see what they created. Members see what is assigned to them, and
/// anything else is invisible rather than forbidden.
pub struct ProgramScope<'a> {
    identity: &'a Identity,
    store: &'a dyn Store,
}

impl<'a> ProgramScope<'a> {
    pub fn new(identity: &'a Identity, store: &'a dyn Store) -> Self {
        Self { identity, store }
    }

    fn listing_filter(&self) -> ProgramFilter {
        match self.identity.role {
            Role::Pt => ProgramFilter::CreatedBy(self.identity.user_id),
            Role::Member => ProgramFilter::AssignedTo(self.identity.user_id),
        }
    }

    pub async fn list(&self) -> ScopeResult<Vec<WorkoutProgram>> {
        Ok(self.store.list_programs(self.listing_filter()).await?)
    }

    /// Programs this trainer created for one member
    pub async fn list_for_member(&self, member_id: Uuid) -> ScopeResult<Vec<WorkoutProgram>> {
        let filter = match self.identity.role {
            Role::Pt => ProgramFilter::CreatedByFor {
                creator: self.identity.user_id,
                assignee: member_id,
            },
            Role::Member if member_id == self.identity.user_id => ProgramFilter::AssignedTo(member_id),
            Role::Member => return Err(ScopeError::forbidden("Members can only view their own programs")),
        };
        Ok(self.store.list_programs(filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> ScopeResult<WorkoutProgram> {
        let program = self
            .store
            .find_program(id)
            .await?
            .ok_or(ScopeError::NotFound("Program"))?;

        match self.identity.role {
            Role::Pt if program.created_by_id == self.identity.user_id => Ok(program),
            Role::Pt => Err(ScopeError::forbidden("Program belongs to another trainer")),
            Role::Member if program.assigned_to_id == Some(self.identity.user_id) => Ok(program),
            Role::Member => Err(ScopeError::NotFound("Program")),
        }
    }

    /// `get` plus the referenced exercise rows, in program order
    pub async fn view(&self, id: Uuid) -> ScopeResult<ProgramView> {
        let program = self.get(id).await?;
        self.expand(program).await
    }

    pub async fn expand(&self, program: WorkoutProgram) -> ScopeResult<ProgramView> {
        let mut exercise_details: Vec<Exercise> = Vec::new();
        for entry in program.exercises.iter() {
            if exercise_details.iter().any(|e| e.id == entry.exercise_id) {
                continue;
            }
            // Rows deleted since the program was written are skipped
            if let Some(exercise) = self.store.find_exercise(entry.exercise_id).await? {
                exercise_details.push(exercise);
            }
        }
        Ok(ProgramView {
            program,
            exercise_details,
        })
    }

    pub async fn create(&self, input: ProgramInput) -> ScopeResult<WorkoutProgram> {
        require_pt(self.identity, "create programs")?;
        self.validate(&input).await?;

        let program = self.store.insert_program(self.identity.user_id, input).await?;
        tracing::debug!("Program {} created by {}", program.id, self.identity.user_id);
        Ok(program)
    }

    pub async fn update(&self, id: Uuid, input: ProgramInput) -> ScopeResult<WorkoutProgram> {
        require_pt(self.identity, "edit programs")?;
        self.get(id).await?;
        self.validate(&input).await?;

        self.store
            .update_program(id, self.identity.user_id, input)
            .await?
            .ok_or(ScopeError::NotFound("Program"))
    }

    pub async fn delete(&self, id: Uuid) -> ScopeResult<()> {
        require_pt(self.identity, "delete programs")?;
        self.get(id).await?;

        if self.store.delete_program(id, self.identity.user_id).await? {
            tracing::debug!("Program {} deleted by {}", id, self.identity.user_id);
            Ok(())
        } else {
            Err(ScopeError::NotFound("Program"))
        }
    }

    async fn validate(&self, input: &ProgramInput) -> ScopeResult<()> {
        input.validate().map_err(ScopeError::Invalid)?;

        if let Some(assignee) = input.assigned_to_id {
            let is_member = self
                .store
                .find_user(assignee)
                .await?
                .is_some_and(|user| user.role == Role::Member);
            if !is_member {
                return Err(ScopeError::invalid(format!("Unknown member {}", assignee)));
            }
        }

        let ids: Vec<Uuid> = input.exercises.iter().map(|entry| entry.exercise_id).collect();
        ExerciseScope::new(self.identity, self.store).ensure_visible(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ExerciseInput, ProgramExercise};
    use crate::database::{ExerciseStore, MemoryStore};
    use crate::scope::fixtures::user;

    fn program(name: &str, assigned_to: Option<Uuid>, exercises: Vec<ProgramExercise>) -> ProgramInput {
        ProgramInput {
            name: name.to_string(),
            description: None,
            assigned_to_id: assigned_to,
            exercises,
        }
    }

    fn entry(exercise_id: Uuid) -> ProgramExercise {
        ProgramExercise {
            exercise_id,
            sets: 3,
            reps: 10,
            rest_seconds: Some(90),
            notes: None,
        }
    }

    #[tokio::test]
    async fn member_cannot_read_another_members_program() {
        let store = MemoryStore::new();
        let pt = user(&store, "pt1@example.com", Role::Pt).await;
        let m1 = user(&store, "m1@example.com", Role::Member).await;
        let m2 = user(&store, "m2@example.com", Role::Member).await;

        let p = ProgramScope::new(&pt, &store)
            .create(program("Strength A", Some(m2.user_id), vec![]))
            .await
            .unwrap();

        let m1_scope = ProgramScope::new(&m1, &store);
        assert!(matches!(m1_scope.get(p.id).await, Err(ScopeError::NotFound(_))));
        assert!(m1_scope.list().await.unwrap().is_empty());

        let m2_scope = ProgramScope::new(&m2, &store);
        assert_eq!(m2_scope.get(p.id).await.unwrap().name, "Strength A");
        assert_eq!(m2_scope.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn trainers_only_see_their_own_programs() {
        let store = MemoryStore::new();
        let pt1 = user(&store, "pt1@example.com", Role::Pt).await;
        let pt2 = user(&store, "pt2@example.com", Role::Pt).await;

        let p = ProgramScope::new(&pt1, &store)
            .create(program("Hypertrophy", None, vec![]))
            .await
            .unwrap();

        let other = ProgramScope::new(&pt2, &store);
        assert!(other.list().await.unwrap().is_empty());
        assert!(matches!(other.get(p.id).await, Err(ScopeError::Forbidden(_))));
        assert!(matches!(
            other.update(p.id, program("Stolen", None, vec![])).await,
            Err(ScopeError::Forbidden(_))
        ));
        assert!(matches!(other.delete(p.id).await, Err(ScopeError::Forbidden(_))));
        assert!(matches!(other.delete(Uuid::new_v4()).await, Err(ScopeError::NotFound(_))));
    }

    #[tokio::test]
    async fn members_never_write_programs() {
        let store = MemoryStore::new();
        let pt = user(&store, "pt@example.com", Role::Pt).await;
        let m = user(&store, "m@example.com", Role::Member).await;
        let p = ProgramScope::new(&pt, &store)
            .create(program("Assigned", Some(m.user_id), vec![]))
            .await
            .unwrap();

        let scope = ProgramScope::new(&m, &store);
        assert!(matches!(
            scope.create(program("Self-made", None, vec![])).await,
            Err(ScopeError::Forbidden(_))
        ));
        assert!(matches!(
            scope.update(p.id, program("Edited", Some(m.user_id), vec![])).await,
            Err(ScopeError::Forbidden(_))
        ));
        assert!(matches!(scope.delete(p.id).await, Err(ScopeError::Forbidden(_))));
    }

    #[tokio::test]
    async fn assignee_must_be_an_existing_member() {
        let store = MemoryStore::new();
        let pt = user(&store, "pt@example.com", Role::Pt).await;
        let other_pt = user(&store, "pt2@example.com", Role::Pt).await;
        let scope = ProgramScope::new(&pt, &store);

        assert!(matches!(
            scope.create(program("Nobody", Some(Uuid::new_v4()), vec![])).await,
            Err(ScopeError::Invalid(_))
        ));
        assert!(matches!(
            scope.create(program("Trainer", Some(other_pt.user_id), vec![])).await,
            Err(ScopeError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn referenced_exercises_must_be_visible_to_the_trainer() {
        let store = MemoryStore::new();
        let pt1 = user(&store, "pt1@example.com", Role::Pt).await;
        let pt2 = user(&store, "pt2@example.com", Role::Pt).await;
        let catalog = store.insert_exercise(None, ExerciseInput::named("Plank")).await.unwrap();
        let foreign = store
            .insert_exercise(Some(pt2.user_id), ExerciseInput::named("Secret Move"))
            .await
            .unwrap();

        let scope = ProgramScope::new(&pt1, &store);
        assert!(scope
            .create(program("Core", None, vec![entry(catalog.id)]))
            .await
            .is_ok());
        assert!(matches!(
            scope.create(program("Borrowed", None, vec![entry(foreign.id)])).await,
            Err(ScopeError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn view_expands_exercises_for_the_assigned_member() {
        let store = MemoryStore::new();
        let pt = user(&store, "pt@example.com", Role::Pt).await;
        let m = user(&store, "m@example.com", Role::Member).await;
        let own = ExerciseScope::new(&pt, &store)
            .create(ExerciseInput::named("Sled Push"))
            .await
            .unwrap();

        let p = ProgramScope::new(&pt, &store)
            .create(program("Conditioning", Some(m.user_id), vec![entry(own.id), entry(own.id)]))
            .await
            .unwrap();

        let view = ProgramScope::new(&m, &store).view(p.id).await.unwrap();
        assert_eq!(view.exercise_details.len(), 1);
        assert_eq!(view.exercise_details[0].name, "Sled Push");
    }

    #[tokio::test]
    async fn member_listing_for_other_member_is_forbidden() {
        let store = MemoryStore::new();
        let m1 = user(&store, "m1@example.com", Role::Member).await;
        let m2 = user(&store, "m2@example.com", Role::Member).await;

        let scope = ProgramScope::new(&m1, &store);
        assert!(scope.list_for_member(m1.user_id).await.unwrap().is_empty());
        assert!(matches!(
            scope.list_for_member(m2.user_id).await,
            Err(ScopeError::Forbidden(_))
        ));
    }
}
