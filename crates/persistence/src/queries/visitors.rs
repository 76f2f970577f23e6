// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use parking_domain::{PermitStatus, SelectOptions, Visitor, VisitorFilter};
use time::OffsetDateTime;
use tracing::debug;

use super::lower;
use crate::data_models::VisitorRow;
use crate::diesel_schema::visitors;
use crate::error::PersistenceError;

/// Visitors understand the `active` status only; search is a substring match.
macro_rules! filtered_visitors {
    ($filter:expr, $opts:expr, $now:expr) => {{
        let filter: &VisitorFilter = $filter;
        let opts: &SelectOptions = $opts;
        let now: i64 = $now.unix_timestamp();
        let mut query = visitors::table.into_boxed();
        if let Some(resident_id) = &filter.resident_id {
            query = query.filter(visitors::resident_id.eq(resident_id.clone()));
        }
        if opts.status() == PermitStatus::Active {
            query = query.filter(
                visitors::access_start
                    .le(now)
                    .and(visitors::access_end.ge(now)),
            );
        }
        if let Some(term) = opts.search() {
            let pattern: String = format!("%{term}%");
            query = query.filter(
                lower(visitors::resident_id)
                    .like(pattern.clone())
                    .or(lower(visitors::first_name).like(pattern.clone()))
                    .or(lower(visitors::last_name).like(pattern)),
            );
        }
        query
    }};
}

fn into_visitors(rows: Vec<VisitorRow>) -> Result<Vec<Visitor>, PersistenceError> {
    rows.into_iter().map(Visitor::try_from).collect()
}

backend_fn! {
/// Lists visitors matching `filter` and `opts`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn select_visitors(
    conn: &mut _,
    filter: &VisitorFilter,
    opts: &SelectOptions,
    now: OffsetDateTime,
) -> Result<Vec<Visitor>, PersistenceError> {
    let mut query = filtered_visitors!(filter, opts, now);
    query = if opts.reversed() {
        query.order(visitors::id.desc())
    } else {
        query.order(visitors::id.asc())
    };
    if opts.is_paged() {
        query = query.limit(opts.limit()).offset(opts.offset());
    }

    let rows: Vec<VisitorRow> = query
        .select(VisitorRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    debug!(count = rows.len(), "Loaded visitors");
    into_visitors(rows)
}
}

backend_fn! {
/// Counts visitors matching `filter` and `opts`, ignoring paging.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_visitors(
    conn: &mut _,
    filter: &VisitorFilter,
    opts: &SelectOptions,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let count: i64 = filtered_visitors!(filter, opts, now)
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(count)
}
}

backend_fn! {
/// Retrieves a visitor by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the visitor does not exist.
pub fn get_visitor(conn: &mut _, visitor_id: &str) -> Result<Option<Visitor>, PersistenceError> {
    let result: Result<VisitorRow, diesel::result::Error> = visitors::table
        .find(visitor_id)
        .select(VisitorRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Visitor::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}
