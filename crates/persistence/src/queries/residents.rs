// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{Resident, SelectOptions};
use tracing::debug;

use super::lower;
use crate::data_models::ResidentRow;
use crate::diesel_schema::residents;
use crate::error::PersistenceError;

/// Residents have no status predicate; only search applies.
macro_rules! filtered_residents {
    ($opts:expr) => {{
        let opts: &SelectOptions = $opts;
        let mut query = residents::table.into_boxed();
        if let Some(term) = opts.search() {
            let term: String = term.to_string();
            query = query.filter(
                lower(residents::id)
                    .eq(term.clone())
                    .or(lower(residents::first_name).eq(term.clone()))
                    .or(lower(residents::last_name).eq(term)),
            );
        }
        query
    }};
}

backend_fn! {
/// Lists residents matching `opts`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn select_residents(
    conn: &mut _,
    opts: &SelectOptions,
) -> Result<Vec<Resident>, PersistenceError> {
    let mut query = filtered_residents!(opts);
    query = if opts.reversed() {
        query.order(residents::id.desc())
    } else {
        query.order(residents::id.asc())
    };
    if opts.is_paged() {
        query = query.limit(opts.limit()).offset(opts.offset());
    }

    let rows: Vec<ResidentRow> = query
        .select(ResidentRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    debug!(count = rows.len(), "Loaded residents");
    Ok(rows.into_iter().map(Resident::from).collect())
}
}

backend_fn! {
/// Counts residents matching `opts`, ignoring paging.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_residents(conn: &mut _, opts: &SelectOptions) -> Result<i64, PersistenceError> {
    let count: i64 = filtered_residents!(opts)
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(count)
}
}

backend_fn! {
/// Retrieves a resident by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the resident is not found.
pub fn get_resident(conn: &mut _, resident_id: &str) -> Result<Option<Resident>, PersistenceError> {
    let result: Result<ResidentRow, diesel::result::Error> = residents::table
        .find(resident_id)
        .select(ResidentRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Resident::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves a resident by email, compared case-insensitively.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no resident uses the address.
pub fn get_resident_by_email(
    conn: &mut _,
    email: &str,
) -> Result<Option<Resident>, PersistenceError> {
    let result: Result<ResidentRow, diesel::result::Error> = residents::table
        .filter(lower(residents::email).eq(email.to_lowercase()))
        .select(ResidentRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Resident::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}
