// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names follow the wire format (`camelCase`, with `ID` suffixes
//! spelled out as the clients expect).

use parking_domain::{CarFields, CarPatch, PermitPatch, PermitStatus, ResidentPatch, SelectOptions};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::Role;
use crate::error::ApiError;

/// The public view of a logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

/// Returned by login and token refresh. The refresh token travels separately
/// as a cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

/// A session plus the refresh token the server must set as a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub session: Session,
    pub refresh_token: String,
}

/// A plain confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMetadata {
    pub total_amount: i64,
}

/// One page of a list plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWithMetadata<T> {
    pub records: Vec<T>,
    pub metadata: ListMetadata,
}

impl<T> ListWithMetadata<T> {
    #[must_use]
    pub const fn new(records: Vec<T>, total_amount: i64) -> Self {
        Self {
            records,
            metadata: ListMetadata { total_amount },
        }
    }
}

/// Query string shared by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub reversed: Option<bool>,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ListQuery {
    /// Builds the select options this query asks for.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for an unknown status.
    pub fn to_select_options(&self) -> Result<SelectOptions, ApiError> {
        let status: PermitStatus = self
            .status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|message: String| ApiError::InvalidInput {
                field: String::from("status"),
                message,
            })?;
        Ok(SelectOptions::new()
            .with_limit_and_offset(self.limit.unwrap_or_default(), self.page.unwrap_or(1))
            .with_reversed(self.reversed.unwrap_or(false))
            .with_search(self.search.as_deref().unwrap_or_default())
            .with_status(status))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordChangeRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetEmailRequest {
    #[serde(default)]
    pub id: String,
}

/// A permit request.
///
/// With a `carID` the permit is issued for that existing car; without one,
/// the inline car fields describe a new car to register for the resident.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermitRequest {
    #[serde(rename = "residentID", default)]
    pub resident_id: String,
    #[serde(rename = "carID", default)]
    pub car_id: String,
    #[serde(flatten)]
    pub car: CarFields,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub exception_reason: Option<String>,
}

impl CreatePermitRequest {
    /// The exception reason, treating an empty string as none.
    #[must_use]
    pub fn exception(&self) -> Option<&str> {
        self.exception_reason
            .as_deref()
            .filter(|reason| !reason.is_empty())
    }
}

/// Edits to a car's display fields. Empty strings leave a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarEditRequest {
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl CarEditRequest {
    #[must_use]
    pub fn into_car_patch(self) -> CarPatch {
        CarPatch {
            license_plate: non_empty(self.license_plate),
            color: non_empty(self.color),
            make: non_empty(self.make),
            model: non_empty(self.model),
            amt_parking_days_used: None,
        }
    }

    #[must_use]
    pub fn into_permit_patch(self) -> PermitPatch {
        PermitPatch {
            license_plate: non_empty(self.license_plate),
            color: non_empty(self.color),
            make: non_empty(self.make),
            model: non_empty(self.model),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    #[serde(rename = "residentID", default)]
    pub resident_id: String,
    #[serde(flatten)]
    pub car: CarFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResidentRequest {
    #[serde(alias = "residentID", default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub unlim_days: bool,
}

/// Edits to a resident. Empty strings leave a field unchanged; the flag and
/// counter are written whenever they are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentEditRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub unlim_days: Option<bool>,
    pub amt_parking_days_used: Option<i32>,
}

impl ResidentEditRequest {
    /// The patch this request describes, with the password still in plain text.
    #[must_use]
    pub fn into_patch(self) -> ResidentPatch {
        ResidentPatch {
            first_name: non_empty(self.first_name),
            last_name: non_empty(self.last_name),
            phone: non_empty(self.phone),
            email: non_empty(self.email),
            password: non_empty(self.password),
            unlim_days: self.unlim_days,
            amt_parking_days_used: self.amt_parking_days_used,
            token_version: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitorRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub access_start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub access_end: Option<OffsetDateTime>,
    #[serde(default)]
    pub is_forever: bool,
}
