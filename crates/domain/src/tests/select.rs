// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Duration, macros::datetime};

use crate::{PermitStatus, SelectOptions};
use crate::constants::{DEFAULT_LIMIT, MAX_LIMIT};

#[test]
fn test_limit_is_clamped() {
    assert_eq!(SelectOptions::new().limit(), DEFAULT_LIMIT);
    assert_eq!(
        SelectOptions::new().with_limit_and_offset(-5, 1).limit(),
        DEFAULT_LIMIT
    );
    assert_eq!(
        SelectOptions::new().with_limit_and_offset(5000, 1).limit(),
        MAX_LIMIT
    );
    assert_eq!(SelectOptions::new().with_limit_and_offset(10, 1).limit(), 10);
}

#[test]
fn test_offset_from_page() {
    let opts: SelectOptions = SelectOptions::new().with_limit_and_offset(10, 3);
    assert_eq!(opts.offset(), 20);

    let opts: SelectOptions = SelectOptions::new().with_limit_and_offset(10, 0);
    assert_eq!(opts.offset(), 0);
}

#[test]
fn test_offset_saturates_for_huge_page() {
    let opts: SelectOptions = SelectOptions::new().with_limit_and_offset(MAX_LIMIT, i64::MAX);
    assert_eq!(opts.offset(), i64::MAX);

    let opts: SelectOptions = SelectOptions::new().with_limit_and_offset(1, i64::MAX);
    assert_eq!(opts.offset(), i64::MAX - 1);
}

#[test]
fn test_search_is_trimmed_and_lowercased() {
    let opts: SelectOptions = SelectOptions::new().with_search("  ABC123 ");
    assert_eq!(opts.search(), Some("abc123"));

    let opts: SelectOptions = SelectOptions::new().with_search("   ");
    assert_eq!(opts.search(), None);
}

#[test]
fn test_for_count_drops_paging_only() {
    let opts: SelectOptions = SelectOptions::new()
        .with_limit_and_offset(5, 2)
        .with_reversed(true)
        .with_search("red")
        .with_status(PermitStatus::Active);
    let count: SelectOptions = opts.for_count();
    assert!(!count.is_paged());
    assert!(!count.reversed());
    assert_eq!(count.search(), Some("red"));
    assert_eq!(count.status(), PermitStatus::Active);
}

#[test]
fn test_status_parsing() {
    assert_eq!("".parse::<PermitStatus>(), Ok(PermitStatus::All));
    assert_eq!("Active".parse::<PermitStatus>(), Ok(PermitStatus::Active));
    assert_eq!("exceptions".parse::<PermitStatus>(), Ok(PermitStatus::Exception));
    assert_eq!("expired".parse::<PermitStatus>(), Ok(PermitStatus::Expired));
    assert!("bogus".parse::<PermitStatus>().is_err());
}

#[test]
fn test_expired_bounds_start_from_midnight() {
    let now = datetime!(2026-03-20 15:30 UTC);
    let (oldest, newest) = PermitStatus::expired_bounds(now);
    assert_eq!(newest, datetime!(2026-03-18 0:00 UTC).unix_timestamp());
    assert_eq!(oldest, datetime!(2026-03-05 0:00 UTC).unix_timestamp());
    assert_eq!(newest - oldest, Duration::days(13).whole_seconds());
}
