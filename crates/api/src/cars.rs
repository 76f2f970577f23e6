// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Car registration. Residents only see and touch their own cars.

use parking_domain::{
    Car, CarFilter, CarPatch, DomainError, SelectOptions, is_resident_id, is_uuid_v4,
    validate_car_edit, validate_new_car,
};
use parking_persistence::Persistence;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{
    CarEditRequest, CreateCarRequest, ListQuery, ListWithMetadata, MessageResponse,
};

const CAR_EDIT_FIELDS: &str = "licensePlate, color, make, model";

fn list_with_filter(
    persistence: &mut Persistence,
    filter: &CarFilter,
    query: &ListQuery,
) -> Result<ListWithMetadata<Car>, ApiError> {
    let opts: SelectOptions = query.to_select_options()?;
    let records: Vec<Car> = persistence.select_cars(filter, &opts)?;
    let total: i64 = persistence.count_cars(filter, &opts.for_count())?;
    Ok(ListWithMetadata::new(records, total))
}

/// Fetches a car the caller is allowed to act on.
fn owned_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: &str,
    action: &str,
) -> Result<Car, ApiError> {
    if !is_uuid_v4(car_id) {
        return Err(DomainError::IdNotUuid.into());
    }
    let car: Car = persistence
        .get_car(car_id)?
        .ok_or_else(|| ApiError::not_found("car"))?;
    AuthorizationService::authorize_owner(actor, &car.resident_id, action)?;
    Ok(car)
}

/// Lists cars: all of them for an administrator, their own for a resident.
///
/// # Errors
///
/// Returns an error if the query is invalid or the database fails.
pub fn list_cars(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &ListQuery,
) -> Result<ListWithMetadata<Car>, ApiError> {
    let filter: CarFilter = CarFilter {
        resident_id: actor.resident_scope(),
        ..CarFilter::default()
    };
    list_with_filter(persistence, &filter, query)
}

/// Lists the cars of one resident.
///
/// # Errors
///
/// Returns an error if the caller may not see that resident's cars, the
/// query is invalid, or the database fails.
pub fn list_resident_cars(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    resident_id: &str,
    query: &ListQuery,
) -> Result<ListWithMetadata<Car>, ApiError> {
    AuthorizationService::authorize_owner(actor, resident_id, "list_resident_cars")?;
    let filter: CarFilter = CarFilter {
        resident_id: Some(resident_id.to_string()),
        ..CarFilter::default()
    };
    list_with_filter(persistence, &filter, query)
}

/// Retrieves one car.
///
/// # Errors
///
/// Returns an error if the ID is not a UUID, the car does not exist or
/// belongs to another resident, or the database fails.
pub fn get_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: &str,
) -> Result<Car, ApiError> {
    owned_car(persistence, actor, car_id, "get_car")
}

/// Registers a car for a resident.
///
/// # Errors
///
/// Returns an error if the caller may not register cars for the resident,
/// a field is invalid, the resident does not exist, the resident already
/// has a car with this plate, or the database fails.
pub fn create_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: CreateCarRequest,
) -> Result<Car, ApiError> {
    AuthorizationService::authorize_owner(actor, &request.resident_id, "create_car")?;
    if !is_resident_id(&request.resident_id) {
        return Err(DomainError::InvalidResidentId.into());
    }
    validate_new_car(&request.car)?;

    if persistence.get_resident(&request.resident_id)?.is_none() {
        return Err(ApiError::not_found("resident"));
    }
    let same_plate: CarFilter = CarFilter {
        resident_id: Some(request.resident_id.clone()),
        license_plate: Some(request.car.license_plate.clone()),
    };
    if persistence.count_cars(&same_plate, &SelectOptions::new())? > 0 {
        return Err(DomainError::AlreadyExists(String::from("car with this license plate")).into());
    }

    let car: Car = Car {
        id: Uuid::new_v4().to_string(),
        resident_id: request.resident_id,
        license_plate: request.car.license_plate,
        color: request.car.color,
        make: request.car.make,
        model: request.car.model,
        amt_parking_days_used: 0,
    };
    persistence.create_car(&car)?;
    info!(car_id = %car.id, resident_id = %car.resident_id, "Created car");

    persistence
        .get_car(&car.id)?
        .ok_or_else(|| ApiError::internal("Car missing after insert", &car.id))
}

/// Edits a car's display fields. Existing permits keep their snapshot.
///
/// # Errors
///
/// Returns an error if the car is not the caller's, no field is given, a
/// field is invalid, or the database fails.
pub fn update_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: &str,
    request: CarEditRequest,
) -> Result<Car, ApiError> {
    let patch: CarPatch = request.into_car_patch();
    if patch.is_empty() {
        return Err(DomainError::AllEditFieldsEmpty(CAR_EDIT_FIELDS.to_string()).into());
    }
    validate_car_edit(&patch)?;
    owned_car(persistence, actor, car_id, "update_car")?;

    persistence
        .update_car(car_id, &patch)
        .map_err(|e| ApiError::from_missing(e, "car"))?;
    info!(car_id, "Updated car");

    persistence
        .get_car(car_id)?
        .ok_or_else(|| ApiError::not_found("car"))
}

/// Deletes a car. Its permits are kept.
///
/// # Errors
///
/// Returns an error if the car is not the caller's, does not exist, or the
/// database fails.
pub fn delete_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: &str,
) -> Result<MessageResponse, ApiError> {
    owned_car(persistence, actor, car_id, "delete_car")?;
    persistence
        .delete_car(car_id)
        .map_err(|e| ApiError::from_missing(e, "car"))?;

    info!(car_id, "Deleted car");
    Ok(MessageResponse::new("Successfully deleted car"))
}
