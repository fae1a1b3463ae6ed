use axum::extract::State;
use serde::Serialize;

use crate::access::role_home;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentIdentity};
use crate::scope::Scopes;
use crate::state::AppState;
use crate::types::Identity;

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub identity: Identity,
    pub user: User,
    pub home: String,
}

/// GET /api/auth/whoami - The resolved caller and their account row
pub async fn whoami(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> ApiResult<WhoAmI> {
    let user = Scopes::new(&identity, state.store()).profile().me().await?;

    Ok(ApiResponse::success(WhoAmI {
        home: role_home(&identity),
        identity,
        user,
    }))
}
