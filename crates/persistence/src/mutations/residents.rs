// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{Resident, ResidentPatch};
use tracing::{debug, info};

use crate::data_models::{NewResidentRow, ResidentChangeset};
use crate::diesel_schema::residents;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a resident. The password must already be hashed.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the ID or email is taken.
pub fn create_resident(conn: &mut _, resident: &Resident) -> Result<(), PersistenceError> {
    info!(resident_id = %resident.id, "Creating resident");

    diesel::insert_into(residents::table)
        .values(NewResidentRow::from(resident))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Applies a partial update to a resident.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidArgument` for an empty patch and
/// `PersistenceError::NotFound` if the resident does not exist.
pub fn update_resident(
    conn: &mut _,
    resident_id: &str,
    patch: &ResidentPatch,
) -> Result<(), PersistenceError> {
    if patch.is_empty() {
        return Err(PersistenceError::InvalidArgument(
            "resident update has no fields".to_string(),
        ));
    }

    let affected: usize = diesel::update(residents::table.find(resident_id))
        .set(ResidentChangeset::from(patch))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("resident {resident_id}")));
    }

    debug!(resident_id, "Updated resident");
    Ok(())
}
}

backend_fn! {
/// Deletes a resident; their cars, permits and visitors go with them.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the resident does not exist.
pub fn delete_resident(conn: &mut _, resident_id: &str) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(residents::table.find(resident_id))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("resident {resident_id}")));
    }

    info!(resident_id, "Deleted resident");
    Ok(())
}
}

backend_fn! {
/// Adds `delta` (possibly negative) to a resident's used-days counter.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the resident does not exist.
pub fn add_resident_days(conn: &mut _, resident_id: &str, delta: i32) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(residents::table.find(resident_id))
        .set(residents::amt_parking_days_used.eq(residents::amt_parking_days_used + delta))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("resident {resident_id}")));
    }

    debug!(resident_id, delta, "Adjusted resident parking days");
    Ok(())
}
}
