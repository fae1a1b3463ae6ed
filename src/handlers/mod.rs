// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session required, role checks in middleware
// and ownership checks in the scope layer).
//
// Every request has already passed `access_middleware` by the time a handler
// runs, so handlers only ever see requests the policy allowed.

pub mod protected; // Pages and /api routes that need a session
pub mod public;    // Marketing pages, auth forms, login/register/logout

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids that are not UUIDs cannot name a row
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} not found", what)))
}
