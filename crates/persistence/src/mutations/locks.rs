// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row locks taken at the start of a permit transaction.
//!
//! `SQLite` has no row locks; `BEGIN IMMEDIATE` already holds the database
//! write lock for the whole transaction, so the `SQLite` variants are plain
//! reads. `MySQL` uses `SELECT ... FOR UPDATE`, which cannot be written once
//! for both backends, hence no `backend_fn!` here.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{Car, Resident};

use crate::data_models::{CarRow, ResidentRow};
use crate::diesel_schema::{cars, residents};
use crate::error::PersistenceError;

fn found<R, T: From<R>>(result: QueryResult<R>) -> Result<Option<T>, PersistenceError> {
    match result {
        Ok(row) => Ok(Some(T::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Reads a resident inside the current write transaction.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn lock_resident_sqlite(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> Result<Option<Resident>, PersistenceError> {
    found(
        residents::table
            .find(resident_id)
            .select(ResidentRow::as_select())
            .first(conn),
    )
}

/// Reads and row-locks a resident until the transaction ends.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn lock_resident_mysql(
    conn: &mut MysqlConnection,
    resident_id: &str,
) -> Result<Option<Resident>, PersistenceError> {
    found(
        residents::table
            .find(resident_id)
            .select(ResidentRow::as_select())
            .for_update()
            .first(conn),
    )
}

/// Reads a car inside the current write transaction.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn lock_car_sqlite(
    conn: &mut SqliteConnection,
    car_id: &str,
) -> Result<Option<Car>, PersistenceError> {
    found(cars::table.find(car_id).select(CarRow::as_select()).first(conn))
}

/// Reads and row-locks a car until the transaction ends.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn lock_car_mysql(
    conn: &mut MysqlConnection,
    car_id: &str,
) -> Result<Option<Car>, PersistenceError> {
    found(
        cars::table
            .find(car_id)
            .select(CarRow::as_select())
            .for_update()
            .first(conn),
    )
}
