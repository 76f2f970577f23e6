// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login, session refresh, password changes and password-reset mail.

use parking_domain::{Admin, AdminPatch, DomainError, ResidentPatch, validate_admin};
use parking_persistence::{Persistence, PersistenceError};
use time::OffsetDateTime;
use time::format_description::{self, well_known::Rfc3339};
use tracing::{debug, info, warn};

use crate::auth::{Account, AuthenticatedActor, hash_password, verify_password};
use crate::error::ApiError;
use crate::mailer::{Mailer, ResetEmail};
use crate::request_response::{
    IssuedSession, LoginRequest, MessageResponse, PasswordChangeRequest, ResetEmailRequest,
    Session,
};
use crate::tokens::{RefreshClaims, TokenService};

/// The response to every password-reset request, whether or not the
/// account exists.
pub const RESET_EMAIL_SENT: &str = "If this account is in our database, instructions to reset a \
                                    password have been sent to the email associated with this \
                                    account.";

/// Where reset links point and how dates in reset mail are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetLinkSettings {
    /// Origin the reset page is served from, e.g. `https://parking.example`.
    pub domain: String,
    /// A `time` format description such as `[year]-[month]-[day]`.
    pub date_format: String,
}

fn rejected(reason: &str) -> ApiError {
    ApiError::AuthenticationFailed {
        reason: reason.to_string(),
    }
}

fn issue_session(
    tokens: &TokenService,
    account: &Account,
    now: OffsetDateTime,
) -> Result<IssuedSession, ApiError> {
    let access_token: String = tokens
        .issue_access(account.id(), account.role(), now)
        .map_err(|e| ApiError::internal("Failed to issue access token", e))?;
    let refresh_token: String = tokens
        .issue_refresh(account.id(), account.role(), account.token_version(), now)
        .map_err(|e| ApiError::internal("Failed to issue refresh token", e))?;
    Ok(IssuedSession {
        session: Session {
            user: account.to_user(),
            access_token,
        },
        refresh_token,
    })
}

/// Logs an administrator or a resident in.
///
/// Unknown accounts and wrong passwords fail the same way.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for missing fields,
/// `ApiError::AuthenticationFailed` for bad credentials, or an internal
/// error if the database or token signing fails.
pub fn login(
    persistence: &mut Persistence,
    tokens: &TokenService,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<IssuedSession, ApiError> {
    if request.id.is_empty() || request.password.is_empty() {
        return Err(DomainError::EmptyFields(String::from("id, password")).into());
    }

    let account: Account =
        Account::find(persistence, &request.id)?.ok_or_else(|| rejected("unknown account"))?;
    if !verify_password(&request.password, account.password_hash()) {
        debug!(account_id = %account.id(), "Password mismatch");
        return Err(rejected("password mismatch"));
    }

    info!(account_id = %account.id(), role = %account.role(), "Logged in");
    issue_session(tokens, &account, now)
}

/// Exchanges a refresh token for a new session and a rotated refresh token.
///
/// The account is re-read so that deleted accounts and bumped token
/// versions are refused.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` if the token is missing,
/// invalid, expired or stale, or an internal error if the database or
/// token signing fails.
pub fn refresh_session(
    persistence: &mut Persistence,
    tokens: &TokenService,
    refresh_token: Option<&str>,
    now: OffsetDateTime,
) -> Result<IssuedSession, ApiError> {
    let token: &str = refresh_token.ok_or_else(|| rejected("no refresh token"))?;
    let claims: RefreshClaims = tokens.verify_refresh(token).map_err(|e| {
        debug!(error = %e, "Refresh token refused");
        rejected("invalid refresh token")
    })?;

    let account: Account = Account::find(persistence, &claims.id)?
        .ok_or_else(|| rejected("account no longer exists"))?;
    if account.token_version() != claims.token_version {
        debug!(
            account_id = %claims.id,
            stored = account.token_version(),
            presented = claims.token_version,
            "Stale refresh token"
        );
        return Err(rejected("stale refresh token"));
    }

    issue_session(tokens, &account, now)
}

/// Sets a new password for the calling account.
///
/// The account's token version is bumped, so refresh tokens issued before
/// the change stop working.
///
/// # Errors
///
/// Returns an error if the password is empty, the account no longer
/// exists, or the database fails.
pub fn change_password(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &PasswordChangeRequest,
) -> Result<MessageResponse, ApiError> {
    if request.password.is_empty() {
        return Err(DomainError::EmptyFields(String::from("password")).into());
    }
    let password_hash: String = hash_password(&request.password)?;

    let account: Account = Account::find(persistence, &actor.id)?
        .ok_or_else(|| rejected("account no longer exists"))?;
    let token_version: i32 = account.token_version() + 1;
    let updated: Result<(), PersistenceError> = match &account {
        Account::Admin(admin) => persistence.update_admin(
            &admin.id,
            &AdminPatch {
                password: Some(password_hash),
                token_version: Some(token_version),
            },
        ),
        Account::Resident(resident) => persistence.update_resident(
            &resident.id,
            &ResidentPatch {
                password: Some(password_hash),
                token_version: Some(token_version),
                ..ResidentPatch::default()
            },
        ),
    };
    updated?;

    info!(account_id = %account.id(), "Password changed");
    Ok(MessageResponse::new("Password has been successfully reset."))
}

fn format_request_date(now: OffsetDateTime, date_format: &str) -> String {
    format_description::parse(date_format)
        .ok()
        .and_then(|description| now.format(&description).ok())
        .or_else(|| now.format(&Rfc3339).ok())
        .unwrap_or_default()
}

fn render_reset_email(
    account: &Account,
    token: &str,
    settings: &ResetLinkSettings,
    now: OffsetDateTime,
) -> ResetEmail {
    let user = account.to_user();
    let link: String = format!("{}/reset-password?token={token}", settings.domain);
    let requested_on: String = format_request_date(now, &settings.date_format);
    ResetEmail {
        to_name: format!("{} {}", user.first_name, user.last_name),
        to_address: user.email,
        subject: String::from("Password Reset"),
        body: format!(
            "<body style='text-align: center;'>\
             <h1>Password Reset</h1>\
             <p>Hi, a password reset was requested on {requested_on}.</p>\
             <p>If you sent the request, please click the button below to reset your password. \
             Otherwise, you can ignore this email.</p>\
             <a href='{link}'>Reset Your Password</a>\
             </body>"
        ),
    }
}

/// Mails a password-reset link to the account named in the request.
///
/// Always answers with [`RESET_EMAIL_SENT`]. Lookup, signing and delivery
/// failures are logged and otherwise ignored, so the response never
/// reveals whether an account exists.
pub fn send_reset_email(
    persistence: &mut Persistence,
    tokens: &TokenService,
    mailer: &dyn Mailer,
    settings: &ResetLinkSettings,
    request: &ResetEmailRequest,
    now: OffsetDateTime,
) -> MessageResponse {
    let sent: MessageResponse = MessageResponse::new(RESET_EMAIL_SENT);

    let account: Account = match Account::find(persistence, &request.id) {
        Ok(Some(account)) => account,
        Ok(None) => {
            debug!(account_id = %request.id, "Reset requested for unknown account");
            return sent;
        }
        Err(err) => {
            warn!(account_id = %request.id, error = %err, "Reset lookup failed");
            return sent;
        }
    };

    let token: String = match tokens.issue_access(account.id(), account.role(), now) {
        Ok(token) => token,
        Err(err) => {
            warn!(account_id = %account.id(), error = %err, "Reset token signing failed");
            return sent;
        }
    };

    let email: ResetEmail = render_reset_email(&account, &token, settings, now);
    if let Err(err) = mailer.send(&email) {
        warn!(account_id = %account.id(), error = %err, "Reset mail delivery failed");
    }
    sent
}

/// Creates the first administrator if no account with `admin_id` exists.
///
/// Returns whether an administrator was created.
///
/// # Errors
///
/// Returns an error if the ID or password is empty, hashing fails, or the
/// database fails.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    admin_id: &str,
    password: &str,
) -> Result<bool, ApiError> {
    if persistence.get_admin(admin_id)?.is_some() {
        debug!(admin_id, "Bootstrap administrator already present");
        return Ok(false);
    }
    if password.is_empty() {
        return Err(DomainError::EmptyFields(String::from("password")).into());
    }

    let admin: Admin = Admin {
        id: admin_id.to_string(),
        first_name: String::from("Admin"),
        last_name: String::from("Account"),
        email: format!("{admin_id}@localhost"),
        password: hash_password(password)?,
        is_privileged: true,
        token_version: 0,
    };
    validate_admin(&admin)?;
    persistence.create_admin(&admin)?;

    info!(admin_id, "Created bootstrap administrator");
    Ok(true)
}
