// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Named limits shared by every layer.

use time::{Date, Duration, Month, OffsetDateTime, Time};

/// Page size used when a caller asks for zero or a negative limit.
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest page a caller may request.
pub const MAX_LIMIT: i64 = 1000;

/// Yearly parking-day budget for a resident and for a car.
pub const MAX_PARKING_DAYS: i64 = 20;

/// Longest non-exception permit, in whole days.
pub const MAX_PERMIT_LENGTH: i64 = 15;

/// A permit counts as expired once it ended at least this many days before today.
pub const EXPIRED_GRACE_DAYS: i64 = 2;

/// Expired permits older than this many days drop out of the expired listing.
pub const EXPIRED_WINDOW_DAYS: i64 = 15;

/// Maximum number of non-exception permits a resident may hold over one window.
pub const MAX_OVERLAPPING_RESIDENT_PERMITS: i64 = 2;

/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::minutes(15);

/// Lifetime of a refresh token and its cookie.
pub const REFRESH_TOKEN_TTL: Duration = Duration::days(7);

/// Name of the cookie carrying the refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refresh";

/// Visitor relationship allowed to have indefinite access.
pub const FAMILY_OR_FRIEND: &str = "fam/fri";

/// Visitor relationship that always needs an end date.
pub const CONTRACTOR: &str = "contractor";

/// Seconds in a day, for epoch arithmetic at the store boundary.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// The last representable access instant, `9999-12-31T00:00:00Z`.
///
/// Visitors with indefinite access are stored with this end date.
#[must_use]
pub fn end_of_time() -> OffsetDateTime {
    Date::from_calendar_date(9999, Month::December, 31)
        .map_or(OffsetDateTime::UNIX_EPOCH, |date| {
            date.with_time(Time::MIDNIGHT).assume_utc()
        })
}
