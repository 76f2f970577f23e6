// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{NewPermit, PermitPatch};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewPermitRow, PermitChangeset};
use crate::diesel_schema::permits;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a permit and returns its new ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_permit(conn: &mut _, permit: &NewPermit) -> Result<i64, PersistenceError> {
    diesel::insert_into(permits::table)
        .values(NewPermitRow::from(permit))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;

    let permit_id: i64 = conn.get_last_insert_rowid()?;

    info!(
        permit_id,
        resident_id = %permit.resident_id,
        car_id = %permit.car_id,
        affects_days = permit.affects_days,
        "Created permit"
    );
    Ok(permit_id)
}
}

backend_fn! {
/// Rewrites a permit's car snapshot fields.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidArgument` for an empty patch and
/// `PersistenceError::NotFound` if the permit does not exist.
pub fn update_permit(
    conn: &mut _,
    permit_id: i64,
    patch: &PermitPatch,
) -> Result<(), PersistenceError> {
    if patch.is_empty() {
        return Err(PersistenceError::InvalidArgument(
            "permit update has no fields".to_string(),
        ));
    }

    let affected: usize = diesel::update(permits::table.find(permit_id))
        .set(PermitChangeset::from(patch))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("permit {permit_id}")));
    }

    debug!(permit_id, "Updated permit snapshot");
    Ok(())
}
}

backend_fn! {
/// Deletes a permit.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the permit does not exist.
pub fn delete_permit(conn: &mut _, permit_id: i64) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(permits::table.find(permit_id))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("permit {permit_id}")));
    }

    info!(permit_id, "Deleted permit");
    Ok(())
}
}
