// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{Car, CarPatch};
use tracing::{debug, info};

use crate::data_models::{CarChangeset, NewCarRow};
use crate::diesel_schema::cars;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a car.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the owner does not exist.
pub fn create_car(conn: &mut _, car: &Car) -> Result<(), PersistenceError> {
    info!(car_id = %car.id, resident_id = %car.resident_id, "Creating car");

    diesel::insert_into(cars::table)
        .values(NewCarRow::from(car))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Applies a partial update to a car.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidArgument` for an empty patch and
/// `PersistenceError::NotFound` if the car does not exist.
pub fn update_car(conn: &mut _, car_id: &str, patch: &CarPatch) -> Result<(), PersistenceError> {
    if patch.is_empty() {
        return Err(PersistenceError::InvalidArgument(
            "car update has no fields".to_string(),
        ));
    }

    let affected: usize = diesel::update(cars::table.find(car_id))
        .set(CarChangeset::from(patch))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("car {car_id}")));
    }

    debug!(car_id, "Updated car");
    Ok(())
}
}

backend_fn! {
/// Deletes a car. Its permits are kept.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the car does not exist.
pub fn delete_car(conn: &mut _, car_id: &str) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(cars::table.find(car_id))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("car {car_id}")));
    }

    info!(car_id, "Deleted car");
    Ok(())
}
}

backend_fn! {
/// Adds `delta` (possibly negative) to a car's used-days counter.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the car does not exist.
pub fn add_car_days(conn: &mut _, car_id: &str, delta: i32) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(cars::table.find(car_id))
        .set(cars::amt_parking_days_used.eq(cars::amt_parking_days_used + delta))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("car {car_id}")));
    }

    debug!(car_id, delta, "Adjusted car parking days");
    Ok(())
}
}
