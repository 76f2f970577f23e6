// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permit queries, including the overlap counts behind the issuance checks.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{Permit, PermitFilter, PermitStatus, SelectOptions};
use time::OffsetDateTime;
use tracing::debug;

use super::lower;
use crate::data_models::PermitRow;
use crate::diesel_schema::permits;
use crate::error::PersistenceError;

/// Builds a boxed permit query constrained by `filter` and every non-paging
/// part of `opts`. The backend is inferred from the connection it runs on.
macro_rules! filtered_permits {
    ($filter:expr, $opts:expr, $now:expr) => {{
        let filter: &PermitFilter = $filter;
        let opts: &SelectOptions = $opts;
        let now: OffsetDateTime = $now;
        let mut query = permits::table.into_boxed();

        if let Some(resident_id) = &filter.resident_id {
            query = query.filter(permits::resident_id.eq(resident_id.clone()));
        }
        if let Some(car_id) = &filter.car_id {
            query = query.filter(permits::car_id.eq(car_id.clone()));
        }
        match filter.exception {
            Some(true) => query = query.filter(permits::exception_reason.is_not_null()),
            Some(false) => query = query.filter(permits::exception_reason.is_null()),
            None => {}
        }

        if let Some(term) = opts.search() {
            // Permit IDs start at 1, so a non-numeric term matches no ID.
            let id_term: i64 = term.parse().unwrap_or(0);
            let term: String = term.to_string();
            query = query.filter(
                permits::id
                    .eq(id_term)
                    .or(lower(permits::resident_id).eq(term.clone()))
                    .or(lower(permits::license_plate).eq(term.clone()))
                    .or(lower(permits::color).eq(term.clone()))
                    .or(lower(permits::make).eq(term.clone()))
                    .or(lower(permits::model).eq(term)),
            );
        }

        match opts.status() {
            PermitStatus::All => {}
            PermitStatus::Active => {
                let now: i64 = now.unix_timestamp();
                query = query.filter(permits::start_ts.le(now).and(permits::end_ts.ge(now)));
            }
            PermitStatus::Exception => {
                query = query.filter(permits::exception_reason.is_not_null());
            }
            PermitStatus::Expired => {
                let (oldest, newest) = PermitStatus::expired_bounds(now);
                query = query.filter(permits::end_ts.between(oldest, newest));
            }
        }

        if let Some(window) = opts.window() {
            query = query.filter(
                permits::start_ts
                    .le(window.end.unix_timestamp())
                    .and(permits::end_ts.ge(window.start.unix_timestamp())),
            );
        }

        query
    }};
}

fn into_permits(rows: Vec<PermitRow>) -> Result<Vec<Permit>, PersistenceError> {
    rows.into_iter().map(Permit::try_from).collect()
}

backend_fn! {
/// Lists permits matching `filter` and `opts`, ordered by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `filter` - Equality constraints
/// * `opts` - Paging, ordering, search, status and date window
/// * `now` - Reference instant for status predicates
///
/// # Errors
///
/// Returns an error if the database query fails or a row holds an
/// out-of-range timestamp.
pub fn select_permits(
    conn: &mut _,
    filter: &PermitFilter,
    opts: &SelectOptions,
    now: OffsetDateTime,
) -> Result<Vec<Permit>, PersistenceError> {
    let mut query = filtered_permits!(filter, opts, now);
    query = if opts.reversed() {
        query.order(permits::id.desc())
    } else {
        query.order(permits::id.asc())
    };
    if opts.is_paged() {
        query = query.limit(opts.limit()).offset(opts.offset());
    }

    let rows: Vec<PermitRow> = query
        .select(PermitRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    debug!(count = rows.len(), status = %opts.status(), "Loaded permits");
    into_permits(rows)
}
}

backend_fn! {
/// Counts permits matching `filter` and `opts`, ignoring paging.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_permits(
    conn: &mut _,
    filter: &PermitFilter,
    opts: &SelectOptions,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let count: i64 = filtered_permits!(filter, &opts.for_count(), now)
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(count)
}
}

backend_fn! {
/// Retrieves one permit by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the permit does not exist.
pub fn get_permit(conn: &mut _, permit_id: i64) -> Result<Option<Permit>, PersistenceError> {
    let result: Result<PermitRow, diesel::result::Error> = permits::table
        .find(permit_id)
        .select(PermitRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Permit::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Counts a resident's regular (non-exception) permits intersecting
/// `[start, end]`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_resident_overlapping(
    conn: &mut _,
    resident_id: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let count: i64 = permits::table
        .filter(permits::resident_id.eq(resident_id))
        .filter(permits::exception_reason.is_null())
        .filter(permits::start_ts.le(end.unix_timestamp()))
        .filter(permits::end_ts.ge(start.unix_timestamp()))
        .count()
        .get_result(conn)?;
    debug!(resident_id, count, "Counted overlapping resident permits");
    Ok(count)
}
}

backend_fn! {
/// Counts every permit on a car intersecting `[start, end]`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_car_overlapping(
    conn: &mut _,
    car_id: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let count: i64 = permits::table
        .filter(permits::car_id.eq(car_id))
        .filter(permits::start_ts.le(end.unix_timestamp()))
        .filter(permits::end_ts.ge(start.unix_timestamp()))
        .count()
        .get_result(conn)?;
    debug!(car_id, count, "Counted overlapping car permits");
    Ok(count)
}
}
