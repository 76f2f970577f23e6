// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Composable list modifiers.
//!
//! A `SelectOptions` value is built left to right with the `with_*`
//! methods and handed to a repository, which applies the parts it
//! understands. Repositories without a status predicate ignore the status.

use time::{Duration, OffsetDateTime, Time};

use crate::constants::{DEFAULT_LIMIT, EXPIRED_GRACE_DAYS, EXPIRED_WINDOW_DAYS, MAX_LIMIT};

/// Derived permit status used to filter listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermitStatus {
    #[default]
    All,
    Active,
    Exception,
    Expired,
}

impl PermitStatus {
    /// Inclusive `(oldest, newest)` epoch bounds on `end_date` for expired permits.
    ///
    /// A permit is expired once its end is at least `EXPIRED_GRACE_DAYS`
    /// before the start of today, and stays listed for `EXPIRED_WINDOW_DAYS`.
    #[must_use]
    pub fn expired_bounds(now: OffsetDateTime) -> (i64, i64) {
        let today = now.replace_time(Time::MIDNIGHT);
        let newest = today - Duration::days(EXPIRED_GRACE_DAYS);
        let oldest = today - Duration::days(EXPIRED_WINDOW_DAYS);
        (oldest.unix_timestamp(), newest.unix_timestamp())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Exception => "exception",
            Self::Expired => "expired",
        }
    }
}

impl std::str::FromStr for PermitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "exception" | "exceptions" => Ok(Self::Exception),
            "expired" => Ok(Self::Expired),
            other => Err(format!(
                "status must be one of all, active, exception or expired, got '{other}'"
            )),
        }
    }
}

impl std::fmt::Display for PermitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive time window, compared against `[start_ts, end_ts]` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl DateWindow {
    #[must_use]
    pub const fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }
}

/// Paging, ordering, search and status modifiers for a list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOptions {
    limit: i64,
    page: i64,
    reversed: bool,
    search: Option<String>,
    status: PermitStatus,
    window: Option<DateWindow>,
    paged: bool,
}

impl SelectOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests one page of results.
    ///
    /// The limit is clamped to `MAX_LIMIT`; zero or negative falls back to
    /// `DEFAULT_LIMIT`. Pages are 1-based and anything below 1 means 1.
    #[must_use]
    pub const fn with_limit_and_offset(mut self, limit: i64, page: i64) -> Self {
        self.limit = limit;
        self.page = page;
        self.paged = true;
        self
    }

    /// Orders by ID descending when `reversed`, ascending otherwise.
    #[must_use]
    pub const fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Case-insensitive equality over the repository's search columns.
    ///
    /// An empty string leaves the query unconstrained.
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        let trimmed = search.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: PermitStatus) -> Self {
        self.status = status;
        self
    }

    /// Keeps only rows whose range intersects `[start, end]`.
    #[must_use]
    pub const fn with_date_intersect(mut self, start: OffsetDateTime, end: OffsetDateTime) -> Self {
        self.window = Some(DateWindow::new(start, end));
        self
    }

    /// Effective page size.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        if self.limit <= 0 {
            DEFAULT_LIMIT
        } else if self.limit > MAX_LIMIT {
            MAX_LIMIT
        } else {
            self.limit
        }
    }

    /// Row offset of the requested page. Saturates at `i64::MAX`, which
    /// simply yields an empty page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        let page = if self.page < 1 { 1 } else { self.page };
        (page - 1).saturating_mul(self.limit())
    }

    /// Whether paging was requested at all.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.paged
    }

    #[must_use]
    pub const fn reversed(&self) -> bool {
        self.reversed
    }

    /// Lowercased search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub const fn status(&self) -> PermitStatus {
        self.status
    }

    #[must_use]
    pub const fn window(&self) -> Option<DateWindow> {
        self.window
    }

    /// The same options without paging or ordering, for a matching count.
    #[must_use]
    pub fn for_count(&self) -> Self {
        Self {
            limit: 0,
            page: 0,
            reversed: false,
            paged: false,
            ..self.clone()
        }
    }
}
