// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-token extraction and the refresh-token cookie.
//!
//! Access tokens travel in the `Authorization` header and are verified
//! without touching the database. Refresh tokens travel in an `HttpOnly`
//! cookie and are only read by the refresh endpoint.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use parking_api::AuthenticatedActor;
use parking_domain::constants::{REFRESH_COOKIE_NAME, REFRESH_TOKEN_TTL};
use tracing::debug;

use crate::AppState;
use crate::error::HttpError;

/// Extractor for the caller named by a valid access token.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionActor(actor): SessionActor,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing, is not a `Bearer`
/// token, or the token fails verification or has expired.
pub struct SessionActor(pub AuthenticatedActor);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                debug!("Missing or unreadable Authorization header");
                HttpError::unauthorized()
            })?;

        let token: &str = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            debug!("Authorization header does not start with 'Bearer '");
            HttpError::unauthorized()
        })?;

        let actor: AuthenticatedActor = state.tokens.verify_access(token).map_err(|e| {
            debug!(error = %e, "Access token refused");
            HttpError::unauthorized()
        })?;

        debug!(actor_id = %actor.id, role = %actor.role, "Access token accepted");
        Ok(Self(actor))
    }
}

/// Reduces a configured origin such as `https://parking.example:8443/` to
/// the bare host used as the cookie `Domain`.
pub fn cookie_domain(domain: &str) -> &str {
    let without_scheme: &str = domain
        .split_once("://")
        .map_or(domain, |(_, rest)| rest);
    without_scheme
        .split(['/', ':'])
        .next()
        .unwrap_or(without_scheme)
}

/// `Set-Cookie` value carrying a fresh refresh token.
pub fn refresh_cookie(token: &str, domain: &str) -> String {
    format!(
        "{REFRESH_COOKIE_NAME}={token}; Path=/; Domain={}; Max-Age={}; HttpOnly; SameSite=Strict",
        cookie_domain(domain),
        REFRESH_TOKEN_TTL.whole_seconds()
    )
}

/// `Set-Cookie` value that clears the refresh token.
pub fn expired_refresh_cookie(domain: &str) -> String {
    format!(
        "{REFRESH_COOKIE_NAME}=deleted; Path=/; Domain={}; \
         Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Strict",
        cookie_domain(domain)
    )
}

/// Reads the refresh token from the request's `Cookie` headers.
pub fn read_refresh_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == REFRESH_COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
