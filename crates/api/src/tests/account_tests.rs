// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Mutex;

use parking_persistence::Persistence;
use time::OffsetDateTime;

use super::{RESIDENT_ID, new_persistence, resident_actor};
use crate::accounts::{
    RESET_EMAIL_SENT, ResetLinkSettings, bootstrap_admin, change_password, login, refresh_session,
    send_reset_email,
};
use crate::auth::{AuthenticatedActor, Role, hash_password};
use crate::error::ApiError;
use crate::mailer::{MailError, Mailer, ResetEmail};
use crate::request_response::{LoginRequest, PasswordChangeRequest, ResetEmailRequest};
use crate::tokens::TokenService;

const PASSWORD: &str = "correct horse";

/// Keeps every message instead of sending it.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<ResetEmail>>,
    fail: bool,
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &ResetEmail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Delivery(String::from("smtp down")));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

fn tokens() -> TokenService {
    TokenService::new("access-secret", "refresh-secret")
}

fn settings() -> ResetLinkSettings {
    ResetLinkSettings {
        domain: String::from("https://parking.example"),
        date_format: String::from("[year]-[month]-[day]"),
    }
}

/// A database holding resident `B1234567` with a real password hash.
fn setup_accounts() -> Persistence {
    let mut persistence = new_persistence();
    let mut resident = super::create_test_resident(RESIDENT_ID);
    resident.password = hash_password(PASSWORD).unwrap();
    persistence.create_resident(&resident).unwrap();
    persistence
}

fn login_request(id: &str, password: &str) -> LoginRequest {
    LoginRequest {
        id: id.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn test_resident_login_issues_tokens() {
    let mut persistence = setup_accounts();
    let tokens = tokens();

    let issued = login(
        &mut persistence,
        &tokens,
        &login_request(RESIDENT_ID, PASSWORD),
        OffsetDateTime::now_utc(),
    )
    .unwrap();

    assert_eq!(issued.session.user.id, RESIDENT_ID);
    assert_eq!(issued.session.user.role, Role::Resident);
    let actor: AuthenticatedActor = tokens.verify_access(&issued.session.access_token).unwrap();
    assert_eq!(actor.id, RESIDENT_ID);
    let claims = tokens.verify_refresh(&issued.refresh_token).unwrap();
    assert_eq!(claims.token_version, 0);
}

#[test]
fn test_wrong_password_and_unknown_account_fail_alike() {
    let mut persistence = setup_accounts();
    let now = OffsetDateTime::now_utc();

    let wrong = login(
        &mut persistence,
        &tokens(),
        &login_request(RESIDENT_ID, "nope"),
        now,
    )
    .unwrap_err();
    let unknown = login(
        &mut persistence,
        &tokens(),
        &login_request("C7654321", PASSWORD),
        now,
    )
    .unwrap_err();

    assert_eq!(wrong.client_message(), "unauthorized");
    assert_eq!(unknown.client_message(), wrong.client_message());
}

#[test]
fn test_login_requires_both_fields() {
    let mut persistence = setup_accounts();

    let result = login(
        &mut persistence,
        &tokens(),
        &login_request(RESIDENT_ID, ""),
        OffsetDateTime::now_utc(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_access_token_is_not_a_refresh_token() {
    let mut persistence = setup_accounts();
    let tokens = tokens();
    let now = OffsetDateTime::now_utc();
    let issued = login(
        &mut persistence,
        &tokens,
        &login_request(RESIDENT_ID, PASSWORD),
        now,
    )
    .unwrap();

    let result = refresh_session(
        &mut persistence,
        &tokens,
        Some(&issued.session.access_token),
        now,
    );

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_refresh_rotates_session() {
    let mut persistence = setup_accounts();
    let tokens = tokens();
    let now = OffsetDateTime::now_utc();
    let issued = login(
        &mut persistence,
        &tokens,
        &login_request(RESIDENT_ID, PASSWORD),
        now,
    )
    .unwrap();

    let refreshed =
        refresh_session(&mut persistence, &tokens, Some(&issued.refresh_token), now).unwrap();

    assert_eq!(refreshed.session.user.id, RESIDENT_ID);
}

#[test]
fn test_refresh_without_cookie_fails() {
    let mut persistence = setup_accounts();

    let result = refresh_session(&mut persistence, &tokens(), None, OffsetDateTime::now_utc());

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_password_change_revokes_refresh_tokens() {
    let mut persistence = setup_accounts();
    let tokens = tokens();
    let now = OffsetDateTime::now_utc();
    let issued = login(
        &mut persistence,
        &tokens,
        &login_request(RESIDENT_ID, PASSWORD),
        now,
    )
    .unwrap();

    let response = change_password(
        &mut persistence,
        &resident_actor(RESIDENT_ID),
        &PasswordChangeRequest {
            password: String::from("new password"),
        },
    )
    .unwrap();
    let stale = refresh_session(&mut persistence, &tokens, Some(&issued.refresh_token), now);
    let relogin = login(
        &mut persistence,
        &tokens,
        &login_request(RESIDENT_ID, "new password"),
        now,
    );

    assert_eq!(response.message, "Password has been successfully reset.");
    assert!(matches!(stale, Err(ApiError::AuthenticationFailed { .. })));
    assert!(relogin.is_ok());
}

#[test]
fn test_refresh_for_deleted_account_fails() {
    let mut persistence = setup_accounts();
    let tokens = tokens();
    let now = OffsetDateTime::now_utc();
    let issued = login(
        &mut persistence,
        &tokens,
        &login_request(RESIDENT_ID, PASSWORD),
        now,
    )
    .unwrap();
    persistence.delete_resident(RESIDENT_ID).unwrap();

    let result = refresh_session(&mut persistence, &tokens, Some(&issued.refresh_token), now);

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_reset_email_sends_link() {
    let mut persistence = setup_accounts();
    let mailer = RecordingMailer::default();
    let now = OffsetDateTime::now_utc();

    let response = send_reset_email(
        &mut persistence,
        &tokens(),
        &mailer,
        &settings(),
        &ResetEmailRequest {
            id: RESIDENT_ID.to_string(),
        },
        now,
    );

    assert_eq!(response.message, RESET_EMAIL_SENT);
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_address, "b1234567@example.com");
    assert!(
        sent[0]
            .body
            .contains("https://parking.example/reset-password?token=")
    );
    assert!(sent[0].body.contains(&now.year().to_string()));
}

#[test]
fn test_reset_email_hides_unknown_accounts_and_failures() {
    let mut persistence = setup_accounts();
    let quiet = RecordingMailer::default();
    let broken = RecordingMailer {
        fail: true,
        ..RecordingMailer::default()
    };
    let now = OffsetDateTime::now_utc();

    let unknown = send_reset_email(
        &mut persistence,
        &tokens(),
        &quiet,
        &settings(),
        &ResetEmailRequest {
            id: String::from("C7654321"),
        },
        now,
    );
    let failed = send_reset_email(
        &mut persistence,
        &tokens(),
        &broken,
        &settings(),
        &ResetEmailRequest {
            id: RESIDENT_ID.to_string(),
        },
        now,
    );

    assert_eq!(unknown.message, RESET_EMAIL_SENT);
    assert_eq!(failed.message, RESET_EMAIL_SENT);
    assert!(quiet.sent.lock().unwrap().is_empty());
}

#[test]
fn test_bootstrap_admin_runs_once() {
    let mut persistence = new_persistence();

    let created = bootstrap_admin(&mut persistence, "admin", PASSWORD).unwrap();
    let again = bootstrap_admin(&mut persistence, "ADMIN", PASSWORD).unwrap();
    let issued = login(
        &mut persistence,
        &tokens(),
        &login_request("admin", PASSWORD),
        OffsetDateTime::now_utc(),
    )
    .unwrap();

    assert!(created);
    assert!(!again);
    assert_eq!(issued.session.user.role, Role::Admin);
    assert_eq!(persistence.count_admins().unwrap(), 1);
}

#[test]
fn test_admin_password_change_bumps_version() {
    let mut persistence = new_persistence();
    bootstrap_admin(&mut persistence, "admin", PASSWORD).unwrap();

    change_password(
        &mut persistence,
        &AuthenticatedActor::new(String::from("admin"), Role::Admin),
        &PasswordChangeRequest {
            password: String::from("rotated"),
        },
    )
    .unwrap();

    let admin = persistence.get_admin("admin").unwrap().unwrap();
    assert_eq!(admin.token_version, 1);
}
