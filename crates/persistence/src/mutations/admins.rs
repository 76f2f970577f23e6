// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{Admin, AdminPatch};
use tracing::info;

use crate::data_models::{AdminChangeset, NewAdminRow};
use crate::diesel_schema::admins;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts an administrator. The password must already be hashed.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the ID is taken.
pub fn create_admin(conn: &mut _, admin: &Admin) -> Result<(), PersistenceError> {
    info!(admin_id = %admin.id, "Creating admin");

    diesel::insert_into(admins::table)
        .values(NewAdminRow::from(admin))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Applies a partial update to an administrator.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the administrator does not exist.
pub fn update_admin(
    conn: &mut _,
    admin_id: &str,
    patch: &AdminPatch,
) -> Result<(), PersistenceError> {
    if patch.password.is_none() && patch.token_version.is_none() {
        return Err(PersistenceError::InvalidArgument(
            "admin update has no fields".to_string(),
        ));
    }

    let affected: usize = diesel::update(admins::table.find(admin_id))
        .set(AdminChangeset::from(patch))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("admin {admin_id}")));
    }

    info!(admin_id, "Updated admin");
    Ok(())
}
}
