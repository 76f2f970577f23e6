// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::constants::{CONTRACTOR, FAMILY_OR_FRIEND};
use crate::select::PermitStatus;

/// A resident account.
///
/// Residents are created by administrators. Their ID is issued outside the
/// system and matches `^[A-Z]\d{7}$`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    /// bcrypt hash; never serialized.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub unlim_days: bool,
    pub amt_parking_days_used: i32,
    #[serde(skip_serializing, default)]
    pub token_version: i32,
}

impl Resident {
    /// Returns this resident with the password hash blanked.
    #[must_use]
    pub fn redacted(mut self) -> Self {
        self.password.clear();
        self
    }
}

/// A car registered by a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    #[serde(rename = "residentID")]
    pub resident_id: String,
    pub license_plate: String,
    pub color: String,
    pub make: String,
    pub model: String,
    pub amt_parking_days_used: i32,
}

impl Car {
    /// The car's display fields, as frozen into a permit.
    #[must_use]
    pub fn fields(&self) -> CarFields {
        CarFields {
            license_plate: self.license_plate.clone(),
            color: self.color.clone(),
            make: self.make.clone(),
            model: self.model.clone(),
        }
    }
}

/// The identifying fields of a car, shared by car creation and permit snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarFields {
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
}

/// An issued guest parking permit.
///
/// The plate, color, make and model are a snapshot of the car taken at
/// issuance; later edits to the car do not touch the permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    pub id: i64,
    #[serde(rename = "residentID")]
    pub resident_id: String,
    #[serde(rename = "carID")]
    pub car_id: String,
    pub license_plate: String,
    pub color: String,
    pub make: String,
    pub model: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    #[serde(rename = "requestTS", with = "time::serde::rfc3339")]
    pub request_ts: OffsetDateTime,
    pub affects_days: bool,
    pub exception_reason: Option<String>,
}

impl Permit {
    /// Whole days between start and end, the amount charged to the quotas.
    #[must_use]
    pub fn length_days(&self) -> i64 {
        crate::quota::permit_length_days(self.start_date, self.end_date)
    }

    /// True when the permit carries a non-empty exception reason.
    #[must_use]
    pub fn is_exception(&self) -> bool {
        self.exception_reason
            .as_deref()
            .is_some_and(|reason| !reason.is_empty())
    }

    /// Checks whether the permit falls under `status` at instant `now`.
    #[must_use]
    pub fn has_status(&self, status: PermitStatus, now: OffsetDateTime) -> bool {
        let start = self.start_date.unix_timestamp();
        let end = self.end_date.unix_timestamp();
        match status {
            PermitStatus::All => true,
            PermitStatus::Active => {
                let now = now.unix_timestamp();
                start <= now && now <= end
            }
            PermitStatus::Exception => self.is_exception(),
            PermitStatus::Expired => {
                let (oldest, newest) = PermitStatus::expired_bounds(now);
                oldest <= end && end <= newest
            }
        }
    }
}

/// A fully resolved permit row, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermit {
    pub resident_id: String,
    pub car_id: String,
    pub car: CarFields,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub request_ts: OffsetDateTime,
    pub affects_days: bool,
    pub exception_reason: Option<String>,
}

/// How a visitor is related to the resident who registered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    FamilyOrFriend,
    Contractor,
}

impl Relationship {
    /// Parses the wire form (`"fam/fri"` or `"contractor"`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            FAMILY_OR_FRIEND => Some(Self::FamilyOrFriend),
            CONTRACTOR => Some(Self::Contractor),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FamilyOrFriend => FAMILY_OR_FRIEND,
            Self::Contractor => CONTRACTOR,
        }
    }
}

/// A recurring visitor registered by a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: String,
    #[serde(rename = "residentID")]
    pub resident_id: String,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    #[serde(with = "time::serde::rfc3339")]
    pub access_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub access_end: OffsetDateTime,
}

/// An administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub is_privileged: bool,
    #[serde(skip_serializing, default)]
    pub token_version: i32,
}
