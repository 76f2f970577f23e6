// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Signed session tokens.
//!
//! Two HS256 JWTs with separate secrets: a short-lived access token sent as
//! a Bearer header, and a long-lived refresh token kept in an `HttpOnly`
//! cookie. The refresh token carries the account's token version so that a
//! password change invalidates every outstanding session.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use parking_domain::constants::{ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::{AuthenticatedActor, Role};

/// Errors raised while minting or checking a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Claims of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: String,
    pub role: Role,
    pub exp: i64,
}

/// Claims of a refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub id: String,
    pub role: Role,
    pub token_version: i32,
    pub exp: i64,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies access and refresh tokens.
pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service from the two HMAC secrets.
    #[must_use]
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            access: KeyPair::from_secret(access_secret),
            refresh: KeyPair::from_secret(refresh_secret),
            validation: Validation::default(),
        }
    }

    /// Mints an access token valid for `ACCESS_TOKEN_TTL` from `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    pub fn issue_access(
        &self,
        id: &str,
        role: Role,
        now: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let claims: AccessClaims = AccessClaims {
            id: id.to_string(),
            role,
            exp: (now + ACCESS_TOKEN_TTL).unix_timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.access.encoding)
            .map_err(TokenError::Encode)
    }

    /// Mints a refresh token valid for `REFRESH_TOKEN_TTL` from `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    pub fn issue_refresh(
        &self,
        id: &str,
        role: Role,
        token_version: i32,
        now: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let claims: RefreshClaims = RefreshClaims {
            id: id.to_string(),
            role,
            token_version,
            exp: (now + REFRESH_TOKEN_TTL).unix_timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.refresh.encoding)
            .map_err(TokenError::Encode)
    }

    /// Verifies an access token and returns the caller it names.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, a wrong algorithm
    /// or an expired token.
    pub fn verify_access(&self, token: &str) -> Result<AuthenticatedActor, TokenError> {
        let claims: AccessClaims =
            jsonwebtoken::decode::<AccessClaims>(token, &self.access.decoding, &self.validation)
                .map_err(TokenError::Invalid)?
                .claims;
        Ok(AuthenticatedActor::new(claims.id, claims.role))
    }

    /// Verifies a refresh token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, a wrong algorithm
    /// or an expired token.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        jsonwebtoken::decode::<RefreshClaims>(token, &self.refresh.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}
