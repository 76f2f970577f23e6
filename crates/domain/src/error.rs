// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::constants::{MAX_PARKING_DAYS, MAX_PERMIT_LENGTH};
use crate::quota::QuotaEntity;

/// Errors raised by domain validation and the permit policy.
///
/// The `Display` output of every variant is the exact message shown to
/// the person using the system; callers forward it without rewording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A request payload could not be decoded.
    Malformed(String),
    /// Required fields were missing (comma separated names).
    EmptyFields(String),
    /// One or more fields failed validation (sentence list).
    InvalidFields(String),
    /// An entity ID was required but absent.
    MissingIdField,
    /// An ID that must be a UUIDv4 was not one.
    IdNotUuid,
    /// The resident ID cannot request permits.
    InvalidResidentId,
    /// A partial update carried no fields.
    AllEditFieldsEmpty(String),
    /// A resource lookup came back empty.
    NotFound(String),
    /// A uniqueness rule was violated.
    AlreadyExists(String),
    /// The caller may not perform the action.
    Unauthorized,
    /// The permit names a resident that has no account.
    ResidentForPermitDne,
    /// The permit names a car that does not exist.
    CarForPermitDne,
    /// The car already has a permit overlapping the requested window.
    CarActivePermit,
    /// The requested window is longer than the permit length limit.
    PermitTooLong,
    /// The resident already holds two permits over the requested window.
    ResidentTwoActivePermits,
    /// The entity has already used its whole yearly budget.
    EntityDaysTooLong {
        /// Which counter ran out.
        entity: QuotaEntity,
        /// Days already charged to the entity.
        days_used: i64,
    },
    /// The request would push the entity over its yearly budget.
    PermitPlusEntityDaysTooLong {
        /// Which counter would overflow.
        entity: QuotaEntity,
        /// Days already charged to the entity.
        days_used: i64,
    },
}

impl DomainError {
    /// Returns true for the user-facing permit policy rejections.
    #[must_use]
    pub const fn is_permit_policy(&self) -> bool {
        matches!(
            self,
            Self::ResidentForPermitDne
                | Self::CarForPermitDne
                | Self::CarActivePermit
                | Self::PermitTooLong
                | Self::ResidentTwoActivePermits
                | Self::EntityDaysTooLong { .. }
                | Self::PermitPlusEntityDaysTooLong { .. }
        )
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(payload) => write!(f, "{payload} malformed"),
            Self::EmptyFields(fields) => write!(f, "One or more missing fields: {fields}"),
            Self::InvalidFields(details) => write!(f, "One or more invalid fields: {details}"),
            Self::MissingIdField => write!(f, "ID field is required but missing"),
            Self::IdNotUuid => write!(f, "ID field is not a UUID"),
            Self::InvalidResidentId => write!(
                f,
                "ResidentID must be a capital letter other than 'P', followed by 7 numbers"
            ),
            Self::AllEditFieldsEmpty(fields) => {
                write!(f, "All edit fields ({fields}) cannot be empty")
            }
            Self::NotFound(resource) => write!(f, "{resource} not found"),
            Self::AlreadyExists(resource) => write!(f, "{resource} already exists"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::ResidentForPermitDne => write!(
                f,
                "Users must have a registered account to request a guest parking permit. \
                 Please create their account before requesting their permit."
            ),
            Self::CarForPermitDne => write!(
                f,
                "The car that you chose for this permit does not exist. \
                 Please create or choose another car."
            ),
            Self::CarActivePermit => write!(
                f,
                "Cannot create a permit during these dates because this car has at least \
                 one active permit during that time."
            ),
            Self::PermitTooLong => write!(
                f,
                "Error: Requests cannot be longer than {MAX_PERMIT_LENGTH} days, unless there \
                 is an exception.\nIf this resident wants their guest to park for more than \
                 {MAX_PERMIT_LENGTH} days, they can apply for another request once that one \
                 expires."
            ),
            Self::ResidentTwoActivePermits => write!(
                f,
                "Cannot create a permit during these dates because this resident has at \
                 least two active permits during that time."
            ),
            Self::EntityDaysTooLong { entity, days_used } => write!(
                f,
                "Error: This {entity} has used parking permits that have lasted a combined \
                 total of {days_used} days.\n{title}s are allowed maximum {MAX_PARKING_DAYS} \
                 days of parking passes, unless there is an exception.\nThis {entity} must \
                 wait until next year to give out new parking passes.",
                title = entity.title(),
            ),
            Self::PermitPlusEntityDaysTooLong { entity, days_used } => write!(
                f,
                "Error: This request would exceed the {entity}'s yearly guest parking pass \
                 limit of {MAX_PARKING_DAYS} days.\nThis {entity} has given out parking permits \
                 for a total of {days_used} days.\nThis {entity} can give out max {remaining} \
                 more day(s) before reaching their limit.\nThis {entity} can only give more \
                 permits if they have unlimited days or if their requested permits are \
                 exceptions",
                remaining = MAX_PARKING_DAYS - days_used,
            ),
        }
    }
}

impl std::error::Error for DomainError {}
