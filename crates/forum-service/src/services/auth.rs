//! Authentication service
//!
//! Registration, login, token refresh and logout, plus resolving a bearer
//! token to the caller's identity through the in-process identity cache.

use forum_cache::{CachedIdentity, RefreshTokenData};
use forum_common::auth::TokenPair;
use forum_common::AppError;
use forum_core::{DomainError, Snowflake, User};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{AuthResponse, CurrentUserResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(
        &self,
        request: RegisterRequest,
        user_agent: Option<String>,
    ) -> ServiceResult<AuthResponse> {
        let username = User::normalize_username(&request.username)?;
        let email = request.email.trim().to_lowercase();

        // Hashing also enforces the password policy
        let password_hash = self.ctx.password_service().hash(&request.password)?;

        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }
        if self.ctx.user_repo().username_exists(&username).await? {
            return Err(DomainError::UsernameTaken.into());
        }

        let user = User::new(self.ctx.generate_id(), username, email);
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered");

        self.start_session(&user, Uuid::new_v4().to_string(), user_agent)
            .await
    }

    /// `login` is an email address when it contains `@`, else a username
    #[instrument(skip(self, request))]
    pub async fn login(
        &self,
        request: LoginRequest,
        user_agent: Option<String>,
    ) -> ServiceResult<AuthResponse> {
        let login = request.login.trim().to_lowercase();
        let user = if login.contains('@') {
            self.ctx.user_repo().find_by_email(&login).await?
        } else {
            self.ctx.user_repo().find_by_username(&login).await?
        };

        let Some(user) = user else {
            warn!("Login failed: unknown account");
            return Err(AppError::InvalidCredentials.into());
        };

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if let Err(e) = self
            .ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
        {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(e.into());
        }

        info!(user_id = %user.id, "User logged in");

        self.start_session(&user, Uuid::new_v4().to_string(), user_agent)
            .await
    }

    /// Rotate a refresh token: the presented one is revoked and a new pair
    /// is issued for the same session
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        let stored = self
            .ctx
            .refresh_token_store()
            .validate(&claims.jti, user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Refresh token not found or revoked");
                ServiceError::App(AppError::InvalidToken)
            })?;

        self.ctx.refresh_token_store().revoke(&claims.jti).await?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        info!(user_id = %user.id, session_id = %stored.session_id, "Tokens refreshed");

        self.start_session(&user, stored.session_id, stored.user_agent)
            .await
    }

    /// Revoke one refresh token, or every session of the user without one
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(&self, user_id: Snowflake, refresh_token: Option<String>) -> ServiceResult<()> {
        match refresh_token {
            Some(token) => {
                let claims = self.ctx.jwt_service().validate_refresh_token(&token)?;
                if claims.user_id()? != user_id {
                    return Err(AppError::InvalidToken.into());
                }
                self.ctx.refresh_token_store().revoke(&claims.jti).await?;
            }
            None => {
                self.ctx
                    .refresh_token_store()
                    .revoke_all_for_user(user_id)
                    .await?;
            }
        }

        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Resolve an access token to the caller's current identity.
    ///
    /// The username comes from the identity cache, falling back to the
    /// database on a miss. A token for a deleted account is rejected.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<CachedIdentity> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;
        let user_id = claims.user_id()?;

        let users = self.ctx.user_repo();
        self.ctx
            .identity_cache()
            .get_or_load(user_id, || async move {
                Ok::<_, ServiceError>(users.find_by_id(user_id).await?.as_ref().map(CachedIdentity::from))
            })
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))
    }

    async fn start_session(
        &self,
        user: &User,
        session_id: String,
        user_agent: Option<String>,
    ) -> ServiceResult<AuthResponse> {
        let pair: TokenPair = self.ctx.jwt_service().issue(user.id, &session_id)?;

        let mut data = RefreshTokenData::new(user.id, session_id);
        if let Some(agent) = user_agent {
            data = data.with_user_agent(agent);
        }
        self.ctx
            .refresh_token_store()
            .store(&pair.refresh_token_id, &data)
            .await?;

        self.ctx.identity_cache().insert(CachedIdentity::from(user));

        Ok(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            user: CurrentUserResponse::from(user),
        })
    }
}
