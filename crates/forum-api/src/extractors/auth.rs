//! Authentication extractor
//!
//! Resolves the bearer token to the caller's current identity. The username
//! comes from the identity cache so a rename is visible on the next request.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use forum_cache::CachedIdentity;
use forum_core::Snowflake;
use forum_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: CachedIdentity,
}

impl AuthUser {
    pub fn user_id(&self) -> Snowflake {
        self.identity.user_id
    }
}

async fn bearer_token<S>(parts: &mut Parts, state: &S) -> Option<String>
where
    S: Send + Sync,
{
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await.ok_or(ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let identity = AuthService::new(app_state.service_context())
            .authenticate(&token)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Bearer token rejected");
                ApiError::from(e)
            })?;

        Ok(AuthUser { identity })
    }
}

/// Caller identity on endpoints that also serve anonymous visitors.
///
/// A missing, expired or unknown token reads as anonymous; only
/// infrastructure failures are surfaced.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<Snowflake> {
        self.0.as_ref().map(AuthUser::user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts, state).await else {
            return Ok(OptionalAuthUser(None));
        };

        let app_state = AppState::from_ref(state);
        match AuthService::new(app_state.service_context())
            .authenticate(&token)
            .await
        {
            Ok(identity) => Ok(OptionalAuthUser(Some(AuthUser { identity }))),
            Err(e) if e.status_code() < 500 => {
                tracing::debug!(error = %e, "Ignoring invalid optional token");
                Ok(OptionalAuthUser(None))
            }
            Err(e) => Err(e.into()),
        }
    }
}
