use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::program::ProgramScope;
use super::{require_pt, ScopeError, ScopeResult};
use crate::auth::password::{hash_password, validate_email_format, validate_password_strength};
use crate::database::models::{NewUser, User, WorkoutProgram};
use crate::database::Store;
use crate::types::{Identity, Role};

#[derive(Debug, Clone, Deserialize)]
pub struct NewMember {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberDetail {
    pub member: User,
    pub programs: Vec<WorkoutProgram>,
}

/// Member management. Only trainers can obtain one.
pub struct MemberDirectory<'a> {
    identity: &'a Identity,
    store: &'a dyn Store,
}

impl<'a> MemberDirectory<'a> {
    pub fn for_identity(identity: &'a Identity, store: &'a dyn Store) -> ScopeResult<Self> {
        require_pt(identity, "manage members")?;
        Ok(Self { identity, store })
    }

    pub async fn list(&self) -> ScopeResult<Vec<User>> {
        Ok(self.store.list_users_by_role(Role::Member).await?)
    }

    pub async fn get(&self, id: Uuid) -> ScopeResult<User> {
        self.store
            .find_user(id)
            .await?
            .filter(|user| user.role == Role::Member)
            .ok_or(ScopeError::NotFound("Member"))
    }

    /// Member profile with the programs this trainer assigned to them
    pub async fn detail(&self, id: Uuid) -> ScopeResult<MemberDetail> {
        let member = self.get(id).await?;
        let programs = ProgramScope::new(self.identity, self.store)
            .list_for_member(member.id)
            .await?;
        Ok(MemberDetail { member, programs })
    }

    pub async fn create(&self, input: NewMember) -> ScopeResult<User> {
        if input.name.trim().is_empty() {
            return Err(ScopeError::invalid("Member name is required"));
        }
        validate_email_format(input.email.trim()).map_err(ScopeError::Invalid)?;
        validate_password_strength(&input.password).map_err(ScopeError::Invalid)?;

        let password_hash = hash_password(&input.password).map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ScopeError::Internal("Failed to store credentials".to_string())
        })?;

        let member = self
            .store
            .insert_user(NewUser::new(&input.email, &input.name, Role::Member, password_hash))
            .await?;
        tracing::info!("Member {} created by trainer {}", member.id, self.identity.user_id);
        Ok(member)
    }
}

/// The caller's own account, and member pages they may view
pub struct ProfileScope<'a> {
    identity: &'a Identity,
    store: &'a dyn Store,
}

impl<'a> ProfileScope<'a> {
    pub fn new(identity: &'a Identity, store: &'a dyn Store) -> Self {
        Self { identity, store }
    }

    pub async fn me(&self) -> ScopeResult<User> {
        self.store
            .find_user(self.identity.user_id)
            .await?
            .ok_or(ScopeError::NotFound("User"))
    }

    /// Trainers view any member; a member views only their own page
    pub async fn member_page(&self, member_id: Uuid) -> ScopeResult<MemberDetail> {
        match self.identity.role {
            Role::Pt => MemberDirectory::for_identity(self.identity, self.store)?
                .detail(member_id)
                .await,
            Role::Member if member_id == self.identity.user_id => {
                let member = self.me().await?;
                let programs = ProgramScope::new(self.identity, self.store).list().await?;
                Ok(MemberDetail { member, programs })
            }
            Role::Member => Err(ScopeError::forbidden("Members can only view their own page")),
        }
    }
}
