//! Authentication service - signup, login and bearer-token verification.
//!
//! Verified tokens are turned into an [`Actor`], which the rest of the
//! application trusts as-is.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Actor, AdminRole, NewUser, Password, Role, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<AdminRole>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// The caller these claims identify.
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, self.role, self.admin_role)
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Signup data, already validated by the handler.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub password: String,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a buyer account
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        admin_role: user.admin_role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        let password_hash = Password::new(&registration.password)?.into_string();
        let new_user = NewUser::buyer(
            registration.email,
            registration.phone,
            registration.full_name,
            password_hash,
        );

        let result = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let users = ctx.users();
                    if users.contact_taken(&new_user.email, &new_user.phone).await? {
                        return Err(AppError::conflict("User"));
                    }
                    users.create(new_user).await
                })
            })
            .await;

        match result {
            Err(e) if e.is_unique_violation() => Err(AppError::conflict("User")),
            Ok(user) => {
                tracing::info!(user_id = user.id, "Buyer account created");
                Ok(user)
            }
            Err(e) => Err(e),
        }
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify even when the account is missing so both paths cost the same
        let stored = user.as_ref().map(|u| u.password_hash.as_str());
        if !Password::verify_stored(stored, &password) {
            return Err(AppError::InvalidCredentials);
        }

        match user {
            Some(user) => generate_token(&user, &self.config),
            None => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
