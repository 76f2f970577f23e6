// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resident account management.

use parking_domain::{
    DomainError, Resident, ResidentPatch, SelectOptions, validate_new_resident,
    validate_resident_edit,
};
use parking_persistence::{Persistence, PersistenceError};
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService, hash_password};
use crate::error::ApiError;
use crate::request_response::{
    CreateResidentRequest, ListQuery, ListWithMetadata, MessageResponse, ResidentEditRequest,
};

fn email_taken() -> ApiError {
    DomainError::AlreadyExists(String::from("a resident with this email")).into()
}

/// Lists residents, searchable by ID, name or email.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or the database fails.
pub fn list_residents(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &ListQuery,
) -> Result<ListWithMetadata<Resident>, ApiError> {
    AuthorizationService::authorize_admin(actor, "list_residents")?;

    let opts: SelectOptions = query.to_select_options()?;
    let records: Vec<Resident> = persistence
        .select_residents(&opts)?
        .into_iter()
        .map(Resident::redacted)
        .collect();
    let total: i64 = persistence.count_residents(&opts.for_count())?;
    Ok(ListWithMetadata::new(records, total))
}

/// Retrieves one resident. A resident may read their own account.
///
/// # Errors
///
/// Returns an error if the caller may not see the resident, it does not
/// exist, or the database fails.
pub fn get_resident(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    resident_id: &str,
) -> Result<Resident, ApiError> {
    AuthorizationService::authorize_owner(actor, resident_id, "get_resident")?;
    persistence
        .get_resident(resident_id)?
        .map(Resident::redacted)
        .ok_or_else(|| ApiError::not_found("resident"))
}

/// Creates a resident account.
///
/// The ID and the email must both be unused. The password is hashed before
/// anything is written.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, a field is
/// invalid, the ID or email is taken, or the database fails.
pub fn create_resident(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: CreateResidentRequest,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "create_resident")?;

    let mut resident: Resident = Resident {
        id: request.id,
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        email: request.email,
        password: request.password,
        unlim_days: request.unlim_days,
        amt_parking_days_used: 0,
        token_version: 0,
    };
    validate_new_resident(&resident)?;

    if persistence.get_resident(&resident.id)?.is_some() {
        return Err(
            DomainError::AlreadyExists(format!("resident with ID {}", resident.id)).into(),
        );
    }
    if persistence.get_resident_by_email(&resident.email)?.is_some() {
        return Err(email_taken());
    }

    resident.password = hash_password(&resident.password)?;
    match persistence.create_resident(&resident) {
        Ok(()) => {}
        Err(PersistenceError::UniqueViolation(_)) => {
            return Err(DomainError::AlreadyExists(String::from("resident")).into());
        }
        Err(err) => return Err(err.into()),
    }

    info!(resident_id = %resident.id, "Created resident");
    Ok(MessageResponse::new("Resident successfully created."))
}

/// Applies a partial update to a resident.
///
/// A new password is hashed and bumps the resident's token version, ending
/// their other sessions.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, no field is
/// given, a field is invalid, the email belongs to someone else, the
/// resident does not exist, or the database fails.
pub fn update_resident(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    resident_id: &str,
    request: ResidentEditRequest,
) -> Result<Resident, ApiError> {
    AuthorizationService::authorize_admin(actor, "update_resident")?;

    let mut patch: ResidentPatch = request.into_patch();
    validate_resident_edit(&patch)?;

    let existing: Resident = persistence
        .get_resident(resident_id)?
        .ok_or_else(|| ApiError::not_found("resident"))?;

    if let Some(email) = patch.email.as_deref() {
        let owner: Option<Resident> = persistence.get_resident_by_email(email)?;
        if owner.is_some_and(|owner| owner.id != existing.id) {
            return Err(email_taken());
        }
    }

    if let Some(password) = patch.password.take() {
        patch.password = Some(hash_password(&password)?);
        patch.token_version = Some(existing.token_version + 1);
    }

    persistence
        .update_resident(resident_id, &patch)
        .map_err(|e| ApiError::from_missing(e, "resident"))?;
    info!(resident_id, "Updated resident");

    persistence
        .get_resident(resident_id)?
        .map(Resident::redacted)
        .ok_or_else(|| ApiError::not_found("resident"))
}

/// Deletes a resident together with their permits, cars and visitors.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the resident
/// does not exist, or the database fails.
pub fn delete_resident(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    resident_id: &str,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "delete_resident")?;

    persistence
        .delete_resident(resident_id)
        .map_err(|e| ApiError::from_missing(e, "resident"))?;

    info!(resident_id, "Deleted resident");
    Ok(MessageResponse::new("Successfully deleted resident"))
}
