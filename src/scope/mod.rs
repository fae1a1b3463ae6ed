// scope/mod.rs - Data scoping
//
// Handlers never touch the store directly for owned resources. They ask
// `Scopes` for an accessor bound to the caller's identity, and that accessor
// is the only place ownership is decided:
//
// - a row that does not exist is `NotFound`, whoever asks
// - a row that exists but belongs to someone else is `Forbidden`
// - an operation the role cannot perform at all is `Forbidden` before any query

pub mod exercise;
pub mod member;
pub mod program;

use thiserror::Error;

use crate::database::{DatabaseError, Store};
use crate::types::{Identity, Role};

pub use exercise::ExerciseScope;
pub use member::{MemberDetail, MemberDirectory, ProfileScope};
pub use program::ProgramScope;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ScopeError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        ScopeError::Forbidden(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ScopeError::Invalid(message.into())
    }
}

pub type ScopeResult<T> = Result<T, ScopeError>;

/// Entry point to every scoped accessor for one request
pub struct Scopes<'a> {
    identity: &'a Identity,
    store: &'a dyn Store,
}

impl<'a> Scopes<'a> {
    pub fn new(identity: &'a Identity, store: &'a dyn Store) -> Self {
        Self { identity, store }
    }

    pub fn exercises(&self) -> ExerciseScope<'a> {
        ExerciseScope::new(self.identity, self.store)
    }

    pub fn programs(&self) -> ProgramScope<'a> {
        ProgramScope::new(self.identity, self.store)
    }

    /// Member management; unavailable to members
    pub fn members(&self) -> ScopeResult<MemberDirectory<'a>> {
        MemberDirectory::for_identity(self.identity, self.store)
    }

    pub fn profile(&self) -> ProfileScope<'a> {
        ProfileScope::new(self.identity, self.store)
    }
}

/// Fails before any query when the caller is not a trainer
pub(crate) fn require_pt(identity: &Identity, action: &str) -> ScopeResult<()> {
    match identity.role {
        Role::Pt => Ok(()),
        Role::Member => Err(ScopeError::forbidden(format!("Members cannot {}", action))),
    }
}
