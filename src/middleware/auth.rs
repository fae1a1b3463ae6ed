use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::access::{classify, decide, Decision, PathClass};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Identity;

/// Resolved caller for the current request, `None` when anonymous.
///
/// Inserted by `access_middleware` only after the policy allowed the request.
#[derive(Clone, Debug, Default)]
pub struct RequestIdentity(pub Option<Identity>);

/// Access control for every request: classify the path, resolve the caller,
/// apply the policy, and only then hand over to the handler.
pub async fn access_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let route = classify(request.uri().path());

    let identity = match resolve_identity(&state, request.headers()).await {
        Ok(identity) => identity,
        Err(e) => {
            if let PathClass::Public(_) = route.class {
                tracing::warn!("Identity lookup failed on public path, continuing anonymously: {}", e);
                None
            } else {
                return ApiError::from(e).into_response();
            }
        }
    };

    let decision = decide(identity.as_ref(), &route.class).for_surface(route.surface);
    tracing::debug!(
        path = %request.uri().path(),
        user = ?identity.as_ref().map(|i| i.user_id),
        decision = ?decision,
        "access decision"
    );

    match decision {
        Decision::Allow => {
            request.extensions_mut().insert(RequestIdentity(identity));
            next.run(request).await
        }
        Decision::RedirectTo(target) => Redirect::to(&target).into_response(),
        Decision::DenyStatus(status) => denial(status).into_response(),
    }
}

/// Credential → identity, confirmed against the user table.
///
/// A user that has been deleted, or whose role changed since the credential
/// was issued, resolves to anonymous.
async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Result<Option<Identity>, DatabaseError> {
    let Some(claims) = state.sessions.resolve_credential(headers) else {
        return Ok(None);
    };

    let identity = claims.identity();
    match state.store().find_user(identity.user_id).await? {
        Some(user) if user.role == identity.role => Ok(Some(identity)),
        Some(_) => {
            tracing::warn!("Session for user {} carries a stale role", identity.user_id);
            Ok(None)
        }
        None => {
            tracing::warn!("Session for unknown user {}", identity.user_id);
            Ok(None)
        }
    }
}

fn denial(status: StatusCode) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::unauthorized("Authentication required"),
        StatusCode::FORBIDDEN => ApiError::forbidden("Insufficient permissions"),
        other => {
            tracing::error!("Unexpected denial status {}", other);
            ApiError::internal_server_error("Request could not be authorized")
        }
    }
}

/// Authenticated caller. Rejects with 401 when the request is anonymous.
#[derive(Clone, Debug)]
pub struct CurrentIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestIdentity>() {
            Some(RequestIdentity(Some(identity))) => Ok(CurrentIdentity(identity.clone())),
            _ => Err(ApiError::unauthorized("Authentication required")),
        }
    }
}

/// Caller if any; used by public routes that behave differently when signed in
#[derive(Clone, Debug)]
pub struct MaybeIdentity(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<RequestIdentity>()
            .and_then(|RequestIdentity(identity)| identity.clone());
        Ok(MaybeIdentity(identity))
    }
}
