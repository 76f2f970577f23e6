// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service layer of the guest parking system.
//!
//! Every operation takes the persistence adapter, the authenticated caller
//! and a request DTO, enforces role rules, runs domain validation, and
//! returns a response DTO or an [`ApiError`]. Permit issuance and release
//! are the only operations that span several tables; they run inside one
//! transaction each.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

pub mod accounts;
mod auth;
pub mod cars;
mod error;
pub mod mailer;
pub mod permits;
mod request_response;
pub mod residents;
mod tokens;
pub mod visitors;

#[cfg(test)]
mod tests;

pub use accounts::{RESET_EMAIL_SENT, ResetLinkSettings};
pub use auth::{
    Account, AuthenticatedActor, AuthorizationService, Role, hash_password, verify_password,
};
pub use error::{ApiError, AuthError, translate_domain_error};
pub use mailer::{LoggingMailer, MailError, Mailer, MailerCredentials, ResetEmail};
pub use request_response::{
    CarEditRequest, CreateCarRequest, CreatePermitRequest, CreateResidentRequest,
    CreateVisitorRequest, IssuedSession, ListMetadata, ListQuery, ListWithMetadata, LoginRequest,
    MessageResponse, PasswordChangeRequest, ResetEmailRequest, ResidentEditRequest, Session, User,
};
pub use tokens::{AccessClaims, RefreshClaims, TokenError, TokenService};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
