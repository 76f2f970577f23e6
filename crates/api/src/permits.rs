// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permit issuance, release, editing and listing.
//!
//! Issuance and deletion each run as one transaction. The resident row (and
//! for an existing car, the car row) is read through the locking accessors
//! before any quota is checked, so two concurrent requests for the same
//! resident or car are serialized and the overlap and used-days checks see
//! each other's writes.

use parking_domain::{
    Car, CarFilter, DomainError, NewPermit, Permit, PermitFilter, QuotaEntity, Resident, SelectOptions,
    affects_days, check_car_overlap, check_entity_days, check_permit_length,
    check_resident_overlap, is_permit_requestor_id, is_uuid_v4, permit_length_days,
    validate_car_edit, validate_new_car, validate_permit_dates,
};
use parking_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::error::ApiError;
use crate::request_response::{
    CarEditRequest, CreatePermitRequest, ListQuery, ListWithMetadata, MessageResponse,
};

const PERMIT_EDIT_FIELDS: &str = "licensePlate, color, make, model";

fn days_delta(length_days: i64) -> Result<i32, ApiError> {
    i32::try_from(length_days).map_err(|e| ApiError::internal("Permit length out of range", e))
}

/// Issues a permit.
///
/// Checks run in a fixed order and the first failure is returned: the date
/// window, the requestor ID, the resident, the resident's quota (unless the
/// permit is an exception), then the car. A request without a `carID`
/// books the resident's car with the same plate when one exists, and
/// otherwise registers a new car inside the same transaction.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated caller
/// * `request` - The permit request
/// * `now` - Issuance instant, recorded as the request timestamp
///
/// # Errors
///
/// Returns an error if:
/// - a resident asks for an exception or for another resident
/// - the dates, the resident ID or an inline car are invalid
/// - the resident or the chosen car does not exist
/// - a length, overlap or used-days rule rejects the permit
/// - the database fails
pub fn create_permit(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreatePermitRequest,
    now: OffsetDateTime,
) -> Result<Permit, ApiError> {
    if actor.role == Role::Resident {
        if request.exception().is_some() {
            return Err(ApiError::InvalidInput {
                field: String::from("exceptionReason"),
                message: String::from("Residents cannot request parking permits with exceptions"),
            });
        }
        AuthorizationService::authorize_owner(actor, &request.resident_id, "create_permit")?;
    }

    validate_permit_dates(request.start_date, request.end_date)?;
    let (start, end): (OffsetDateTime, OffsetDateTime) = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(DomainError::EmptyFields(String::from("startDate, endDate")).into()),
    };
    if !is_permit_requestor_id(&request.resident_id) {
        return Err(DomainError::InvalidResidentId.into());
    }

    let result: Result<Permit, ApiError> =
        persistence.transaction(|tx| issue_permit(tx, request, start, end, now));
    match &result {
        Ok(permit) => info!(
            permit_id = permit.id,
            resident_id = %permit.resident_id,
            car_id = %permit.car_id,
            affects_days = permit.affects_days,
            "Issued permit"
        ),
        Err(err) => debug!(resident_id = %request.resident_id, error = %err, "Permit request rejected"),
    }
    result
}

/// The resident's car already registered under `license_plate`, if any.
/// Plates compare case-insensitively.
fn registered_car_id(
    tx: &mut Persistence,
    resident_id: &str,
    license_plate: &str,
) -> Result<Option<String>, ApiError> {
    let same_plate: CarFilter = CarFilter {
        resident_id: Some(resident_id.to_string()),
        license_plate: Some(license_plate.to_string()),
    };
    let existing: Vec<Car> = tx.select_cars(&same_plate, &SelectOptions::new())?;
    Ok(existing.into_iter().next().map(|car| car.id))
}

fn issue_permit(
    tx: &mut Persistence,
    request: &CreatePermitRequest,
    start: OffsetDateTime,
    end: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<Permit, ApiError> {
    let length_days: i64 = permit_length_days(start, end);
    let exception: Option<&str> = request.exception();

    let resident: Resident = tx
        .lock_resident(&request.resident_id)?
        .ok_or(DomainError::ResidentForPermitDne)?;

    if exception.is_none() {
        check_permit_length(length_days)?;
        let overlapping: i64 = tx.count_resident_overlapping(&resident.id, start, end)?;
        check_resident_overlap(overlapping)?;
        if !resident.unlim_days {
            check_entity_days(
                QuotaEntity::Resident,
                i64::from(resident.amt_parking_days_used),
                length_days,
            )?;
        }
    }

    let existing_car_id: Option<String> = if request.car_id.is_empty() {
        validate_new_car(&request.car)?;
        registered_car_id(tx, &resident.id, &request.car.license_plate)?
    } else {
        if !is_uuid_v4(&request.car_id) {
            return Err(DomainError::IdNotUuid.into());
        }
        Some(request.car_id.clone())
    };

    let car: Car = if let Some(car_id) = existing_car_id {
        let car: Car = tx
            .lock_car(&car_id)?
            .ok_or(DomainError::CarForPermitDne)?;
        check_car_overlap(tx.count_car_overlapping(&car.id, start, end)?)?;
        if exception.is_none() && !resident.unlim_days {
            check_entity_days(
                QuotaEntity::Car,
                i64::from(car.amt_parking_days_used),
                length_days,
            )?;
        }
        car
    } else {
        let car: Car = Car {
            id: Uuid::new_v4().to_string(),
            resident_id: resident.id.clone(),
            license_plate: request.car.license_plate.clone(),
            color: request.car.color.clone(),
            make: request.car.make.clone(),
            model: request.car.model.clone(),
            amt_parking_days_used: 0,
        };
        tx.create_car(&car)?;
        debug!(car_id = %car.id, resident_id = %resident.id, "Registered car for permit");
        car
    };

    let charged: bool = affects_days(exception, resident.unlim_days);
    if charged {
        let delta: i32 = days_delta(length_days)?;
        tx.add_resident_days(&resident.id, delta)?;
        tx.add_car_days(&car.id, delta)?;
    }

    let new_permit: NewPermit = NewPermit {
        resident_id: resident.id,
        car_id: car.id.clone(),
        car: car.fields(),
        start_date: start,
        end_date: end,
        request_ts: now,
        affects_days: charged,
        exception_reason: exception.map(str::to_string),
    };
    let permit_id: i64 = tx.create_permit(&new_permit)?;
    tx.get_permit(permit_id)?
        .ok_or_else(|| ApiError::internal("Permit missing after insert", permit_id))
}

/// Deletes a permit and releases the days it charged.
///
/// A permit whose car has since been deleted still releases the resident's
/// days; the missing car counter is skipped.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the permit does
/// not exist, or the database fails.
pub fn delete_permit(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    permit_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "delete_permit")?;

    persistence.transaction(|tx| -> Result<(), ApiError> {
        let permit: Permit = tx
            .get_permit(permit_id)?
            .ok_or_else(|| ApiError::not_found("permit"))?;
        tx.delete_permit(permit_id)
            .map_err(|e| ApiError::from_missing(e, "permit"))?;

        if permit.affects_days {
            let delta: i32 = -days_delta(permit.length_days())?;
            tx.add_resident_days(&permit.resident_id, delta)?;
            match tx.add_car_days(&permit.car_id, delta) {
                Ok(()) => {}
                Err(err) if err.is_not_found() => {
                    debug!(permit_id, car_id = %permit.car_id, "Car already deleted; skipping release");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    })?;

    info!(permit_id, "Deleted permit");
    Ok(MessageResponse::new("Successfully deleted permit"))
}

/// Edits a permit's car snapshot fields.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, no field is
/// given, a field is malformed, the permit does not exist, or the database
/// fails.
pub fn update_permit(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    permit_id: i64,
    request: CarEditRequest,
) -> Result<Permit, ApiError> {
    AuthorizationService::authorize_admin(actor, "update_permit")?;

    let patch = request.into_permit_patch();
    if patch.is_empty() {
        return Err(DomainError::AllEditFieldsEmpty(PERMIT_EDIT_FIELDS.to_string()).into());
    }
    validate_car_edit(&patch.as_car_patch())?;

    persistence
        .update_permit(permit_id, &patch)
        .map_err(|e| ApiError::from_missing(e, "permit"))?;
    info!(permit_id, "Updated permit");

    persistence
        .get_permit(permit_id)?
        .ok_or_else(|| ApiError::not_found("permit"))
}

/// Retrieves one permit. Residents may only read their own.
///
/// # Errors
///
/// Returns an error if the permit does not exist, belongs to another
/// resident, or the database fails.
pub fn get_permit(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    permit_id: i64,
) -> Result<Permit, ApiError> {
    let permit: Permit = persistence
        .get_permit(permit_id)?
        .ok_or_else(|| ApiError::not_found("permit"))?;
    AuthorizationService::authorize_owner(actor, &permit.resident_id, "get_permit")?;
    Ok(permit)
}

/// Lists permits. Residents only ever see their own.
///
/// # Errors
///
/// Returns an error if the status is unknown or the database fails.
pub fn list_permits(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &ListQuery,
    now: OffsetDateTime,
) -> Result<ListWithMetadata<Permit>, ApiError> {
    let filter: PermitFilter = PermitFilter {
        resident_id: actor.resident_scope(),
        ..PermitFilter::default()
    };
    let opts: SelectOptions = query.to_select_options()?;

    let records: Vec<Permit> = persistence.select_permits(&filter, &opts, now)?;
    let total: i64 = persistence.count_permits(&filter, &opts.for_count(), now)?;
    Ok(ListWithMetadata::new(records, total))
}
