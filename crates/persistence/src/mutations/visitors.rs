// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::Visitor;
use tracing::info;

use crate::data_models::VisitorRow;
use crate::diesel_schema::visitors;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a visitor.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the resident does not exist.
pub fn create_visitor(conn: &mut _, visitor: &Visitor) -> Result<(), PersistenceError> {
    info!(visitor_id = %visitor.id, resident_id = %visitor.resident_id, "Creating visitor");

    diesel::insert_into(visitors::table)
        .values(VisitorRow::from(visitor))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes a visitor.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the visitor does not exist.
pub fn delete_visitor(conn: &mut _, visitor_id: &str) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(visitors::table.find(visitor_id))
        .execute(conn)
        .map_err(|e| PersistenceError::ExecFailed(e.to_string()))?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("visitor {visitor_id}")));
    }

    info!(visitor_id, "Deleted visitor");
    Ok(())
}
}
