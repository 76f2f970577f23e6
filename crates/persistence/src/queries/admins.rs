// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::Admin;
use tracing::debug;

use super::lower;
use crate::data_models::AdminRow;
use crate::diesel_schema::admins;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an administrator by ID.
///
/// The lookup is case-insensitive.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the administrator is not found.
pub fn get_admin(conn: &mut _, admin_id: &str) -> Result<Option<Admin>, PersistenceError> {
    debug!("Looking up admin by id: {}", admin_id);

    let result: Result<AdminRow, diesel::result::Error> = admins::table
        .filter(lower(admins::id).eq(admin_id.to_lowercase()))
        .select(AdminRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Admin::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Counts administrators.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_admins(conn: &mut _) -> Result<i64, PersistenceError> {
    let count: i64 = admins::table.count().get_result(conn)?;
    Ok(count)
}
}
