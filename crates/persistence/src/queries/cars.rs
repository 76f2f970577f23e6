// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{Car, CarFilter, SelectOptions};
use tracing::debug;

use super::lower;
use crate::data_models::CarRow;
use crate::diesel_schema::cars;
use crate::error::PersistenceError;

macro_rules! filtered_cars {
    ($filter:expr, $opts:expr) => {{
        let filter: &CarFilter = $filter;
        let opts: &SelectOptions = $opts;
        let mut query = cars::table.into_boxed();
        if let Some(resident_id) = &filter.resident_id {
            query = query.filter(cars::resident_id.eq(resident_id.clone()));
        }
        if let Some(plate) = &filter.license_plate {
            query = query.filter(lower(cars::license_plate).eq(plate.to_lowercase()));
        }
        if let Some(term) = opts.search() {
            let term: String = term.to_string();
            query = query.filter(
                lower(cars::resident_id)
                    .eq(term.clone())
                    .or(lower(cars::license_plate).eq(term.clone()))
                    .or(lower(cars::color).eq(term.clone()))
                    .or(lower(cars::make).eq(term.clone()))
                    .or(lower(cars::model).eq(term)),
            );
        }
        query
    }};
}

backend_fn! {
/// Lists cars matching `filter` and `opts`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn select_cars(
    conn: &mut _,
    filter: &CarFilter,
    opts: &SelectOptions,
) -> Result<Vec<Car>, PersistenceError> {
    let mut query = filtered_cars!(filter, opts);
    query = if opts.reversed() {
        query.order(cars::id.desc())
    } else {
        query.order(cars::id.asc())
    };
    if opts.is_paged() {
        query = query.limit(opts.limit()).offset(opts.offset());
    }

    let rows: Vec<CarRow> = query
        .select(CarRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    debug!(count = rows.len(), "Loaded cars");
    Ok(rows.into_iter().map(Car::from).collect())
}
}

backend_fn! {
/// Counts cars matching `filter` and `opts`, ignoring paging.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_cars(
    conn: &mut _,
    filter: &CarFilter,
    opts: &SelectOptions,
) -> Result<i64, PersistenceError> {
    let count: i64 = filtered_cars!(filter, opts)
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(count)
}
}

backend_fn! {
/// Retrieves a car by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the car does not exist.
pub fn get_car(conn: &mut _, car_id: &str) -> Result<Option<Car>, PersistenceError> {
    let result: Result<CarRow, diesel::result::Error> = cars::table
        .find(car_id)
        .select(CarRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Car::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}
