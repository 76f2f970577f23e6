// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Quota policy for permit issuance.
//!
//! These checks are pure: callers gather the counts and counters inside
//! their transaction and feed them in here.

use time::OffsetDateTime;

use crate::constants::{
    MAX_OVERLAPPING_RESIDENT_PERMITS, MAX_PARKING_DAYS, MAX_PERMIT_LENGTH, SECONDS_PER_DAY,
};
use crate::error::DomainError;

/// The two kinds of row that carry a used-days counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaEntity {
    Resident,
    Car,
}

impl QuotaEntity {
    /// Capitalised name used at the start of a sentence.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Resident => "Resident",
            Self::Car => "Car",
        }
    }
}

impl std::fmt::Display for QuotaEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resident => write!(f, "resident"),
            Self::Car => write!(f, "car"),
        }
    }
}

/// Number of whole 24 hour periods between `start` and `end`.
#[must_use]
pub const fn permit_length_days(start: OffsetDateTime, end: OffsetDateTime) -> i64 {
    (end.unix_timestamp() - start.unix_timestamp()) / SECONDS_PER_DAY
}

/// Rejects a regular permit longer than `MAX_PERMIT_LENGTH` days.
///
/// # Errors
///
/// Returns `DomainError::PermitTooLong` when `length_days` exceeds the limit.
pub const fn check_permit_length(length_days: i64) -> Result<(), DomainError> {
    if length_days > MAX_PERMIT_LENGTH {
        return Err(DomainError::PermitTooLong);
    }
    Ok(())
}

/// Rejects a third regular permit for a resident over the same window.
///
/// `overlapping` counts the resident's existing non-exception permits that
/// intersect the requested window; the new permit is not included.
///
/// # Errors
///
/// Returns `DomainError::ResidentTwoActivePermits` at two or more.
pub const fn check_resident_overlap(overlapping: i64) -> Result<(), DomainError> {
    if overlapping >= MAX_OVERLAPPING_RESIDENT_PERMITS {
        return Err(DomainError::ResidentTwoActivePermits);
    }
    Ok(())
}

/// Rejects any permit for a car that is already booked over the window.
///
/// # Errors
///
/// Returns `DomainError::CarActivePermit` when `overlapping` is non-zero.
pub const fn check_car_overlap(overlapping: i64) -> Result<(), DomainError> {
    if overlapping != 0 {
        return Err(DomainError::CarActivePermit);
    }
    Ok(())
}

/// Checks a used-days counter against the yearly budget.
///
/// # Arguments
///
/// * `entity` - Which counter is being checked, used in the message
/// * `days_used` - The counter's current value
/// * `length_days` - Length of the requested permit
///
/// # Errors
///
/// Returns `DomainError::EntityDaysTooLong` when the budget is already spent,
/// or `DomainError::PermitPlusEntityDaysTooLong` when the request would
/// overrun it.
pub const fn check_entity_days(
    entity: QuotaEntity,
    days_used: i64,
    length_days: i64,
) -> Result<(), DomainError> {
    if days_used >= MAX_PARKING_DAYS {
        return Err(DomainError::EntityDaysTooLong { entity, days_used });
    }
    if days_used + length_days > MAX_PARKING_DAYS {
        return Err(DomainError::PermitPlusEntityDaysTooLong { entity, days_used });
    }
    Ok(())
}

/// Whether a permit is charged against the resident and car counters.
///
/// Exceptions and residents with unlimited days are never charged.
#[must_use]
pub fn affects_days(exception_reason: Option<&str>, unlim_days: bool) -> bool {
    exception_reason.is_none_or(str::is_empty) && !unlim_days
}
