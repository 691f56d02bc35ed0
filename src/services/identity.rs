//! Identity verification - Resolves a bearer credential to a caller.
//!
//! Tokens are issued elsewhere; this side only verifies the HS256 signature
//! and expiry, then loads the caller's current user record.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: i32,
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated caller, resolved once per request.
#[derive(Clone, Debug)]
pub struct CurrentUser(User);

impl CurrentUser {
    pub fn new(user: User) -> Self {
        Self(user)
    }

    pub fn id(&self) -> i32 {
        self.0.id
    }

    /// Check if caller has admin role.
    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// The caller's user record as loaded at authentication time.
    pub fn user(&self) -> &User {
        &self.0
    }
}

/// Identity verifier trait for dependency injection.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer token and load the caller it belongs to
    async fn verify(&self, token: &str) -> AppResult<CurrentUser>;
}

/// Verify JWT token and extract claims
fn decode_claims(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of IdentityVerifier using Unit of Work.
pub struct JwtVerifier<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> JwtVerifier<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> IdentityVerifier for JwtVerifier<U> {
    async fn verify(&self, token: &str) -> AppResult<CurrentUser> {
        let claims = decode_claims(token, &self.config)?;

        // A valid token for a deleted account is no longer a caller
        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser::new(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret-that-is-long-enough";

    fn config() -> Config {
        Config::new("sqlite::memory:", SECRET).unwrap()
    }

    fn token(sub: i32, exp_offset: i64, secret: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub,
            exp: now + exp_offset,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_valid_token() {
        let claims = decode_claims(&token(5, 3600, SECRET), &config()).unwrap();
        assert_eq!(claims.sub, 5);
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let result = decode_claims(
            &token(5, 3600, "some-other-secret-that-is-long-enough"),
            &config(),
        );
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let result = decode_claims(&token(5, -3600, SECRET), &config());
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }
}
