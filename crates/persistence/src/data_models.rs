// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes exchanged with Diesel and their conversions to domain types.
//!
//! Instants are stored as epoch seconds and booleans as `0`/`1` integers so
//! the same schema reads identically on `SQLite` and `MySQL`.

use diesel::prelude::*;
use parking_domain::{
    Admin, AdminPatch, Car, CarPatch, NewPermit, Permit, PermitPatch, Resident, ResidentPatch,
    Visitor,
};
use time::OffsetDateTime;

use crate::diesel_schema::{admins, cars, permits, residents, visitors};
use crate::error::PersistenceError;

const fn flag(value: bool) -> i32 {
    if value { 1 } else { 0 }
}

fn instant(epoch: i64) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::from_unix_timestamp(epoch)?)
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = residents)]
pub struct ResidentRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub unlim_days: i32,
    pub amt_parking_days_used: i32,
    pub token_version: i32,
}

impl From<ResidentRow> for Resident {
    fn from(row: ResidentRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            email: row.email,
            password: row.password,
            unlim_days: row.unlim_days != 0,
            amt_parking_days_used: row.amt_parking_days_used,
            token_version: row.token_version,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = residents)]
pub struct NewResidentRow<'a> {
    pub id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub unlim_days: i32,
    pub amt_parking_days_used: i32,
    pub token_version: i32,
}

impl<'a> From<&'a Resident> for NewResidentRow<'a> {
    fn from(resident: &'a Resident) -> Self {
        Self {
            id: &resident.id,
            first_name: &resident.first_name,
            last_name: &resident.last_name,
            phone: &resident.phone,
            email: &resident.email,
            password: &resident.password,
            unlim_days: flag(resident.unlim_days),
            amt_parking_days_used: resident.amt_parking_days_used,
            token_version: resident.token_version,
        }
    }
}

/// `None` columns are left untouched by the update.
#[derive(AsChangeset)]
#[diesel(table_name = residents)]
pub struct ResidentChangeset<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub unlim_days: Option<i32>,
    pub amt_parking_days_used: Option<i32>,
    pub token_version: Option<i32>,
}

impl<'a> From<&'a ResidentPatch> for ResidentChangeset<'a> {
    fn from(patch: &'a ResidentPatch) -> Self {
        Self {
            first_name: patch.first_name.as_deref(),
            last_name: patch.last_name.as_deref(),
            phone: patch.phone.as_deref(),
            email: patch.email.as_deref(),
            password: patch.password.as_deref(),
            unlim_days: patch.unlim_days.map(flag),
            amt_parking_days_used: patch.amt_parking_days_used,
            token_version: patch.token_version,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = cars)]
pub struct CarRow {
    pub id: String,
    pub resident_id: String,
    pub license_plate: String,
    pub color: String,
    pub make: String,
    pub model: String,
    pub amt_parking_days_used: i32,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Self {
            id: row.id,
            resident_id: row.resident_id,
            license_plate: row.license_plate,
            color: row.color,
            make: row.make,
            model: row.model,
            amt_parking_days_used: row.amt_parking_days_used,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = cars)]
pub struct NewCarRow<'a> {
    pub id: &'a str,
    pub resident_id: &'a str,
    pub license_plate: &'a str,
    pub color: &'a str,
    pub make: &'a str,
    pub model: &'a str,
    pub amt_parking_days_used: i32,
}

impl<'a> From<&'a Car> for NewCarRow<'a> {
    fn from(car: &'a Car) -> Self {
        Self {
            id: &car.id,
            resident_id: &car.resident_id,
            license_plate: &car.license_plate,
            color: &car.color,
            make: &car.make,
            model: &car.model,
            amt_parking_days_used: car.amt_parking_days_used,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = cars)]
pub struct CarChangeset<'a> {
    pub license_plate: Option<&'a str>,
    pub color: Option<&'a str>,
    pub make: Option<&'a str>,
    pub model: Option<&'a str>,
    pub amt_parking_days_used: Option<i32>,
}

impl<'a> From<&'a CarPatch> for CarChangeset<'a> {
    fn from(patch: &'a CarPatch) -> Self {
        Self {
            license_plate: patch.license_plate.as_deref(),
            color: patch.color.as_deref(),
            make: patch.make.as_deref(),
            model: patch.model.as_deref(),
            amt_parking_days_used: patch.amt_parking_days_used,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = permits)]
pub struct PermitRow {
    pub id: i64,
    pub resident_id: String,
    pub car_id: String,
    pub license_plate: String,
    pub color: String,
    pub make: String,
    pub model: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub request_ts: i64,
    pub affects_days: i32,
    pub exception_reason: Option<String>,
}

impl TryFrom<PermitRow> for Permit {
    type Error = PersistenceError;

    fn try_from(row: PermitRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            resident_id: row.resident_id,
            car_id: row.car_id,
            license_plate: row.license_plate,
            color: row.color,
            make: row.make,
            model: row.model,
            start_date: instant(row.start_ts)?,
            end_date: instant(row.end_ts)?,
            request_ts: instant(row.request_ts)?,
            affects_days: row.affects_days != 0,
            exception_reason: row.exception_reason,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = permits)]
pub struct NewPermitRow<'a> {
    pub resident_id: &'a str,
    pub car_id: &'a str,
    pub license_plate: &'a str,
    pub color: &'a str,
    pub make: &'a str,
    pub model: &'a str,
    pub start_ts: i64,
    pub end_ts: i64,
    pub request_ts: i64,
    pub affects_days: i32,
    pub exception_reason: Option<&'a str>,
}

impl<'a> From<&'a NewPermit> for NewPermitRow<'a> {
    fn from(permit: &'a NewPermit) -> Self {
        Self {
            resident_id: &permit.resident_id,
            car_id: &permit.car_id,
            license_plate: &permit.car.license_plate,
            color: &permit.car.color,
            make: &permit.car.make,
            model: &permit.car.model,
            start_ts: permit.start_date.unix_timestamp(),
            end_ts: permit.end_date.unix_timestamp(),
            request_ts: permit.request_ts.unix_timestamp(),
            affects_days: flag(permit.affects_days),
            // Empty reasons are stored as NULL so "exception" means IS NOT NULL.
            exception_reason: permit
                .exception_reason
                .as_deref()
                .filter(|reason| !reason.is_empty()),
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = permits)]
pub struct PermitChangeset<'a> {
    pub license_plate: Option<&'a str>,
    pub color: Option<&'a str>,
    pub make: Option<&'a str>,
    pub model: Option<&'a str>,
}

impl<'a> From<&'a PermitPatch> for PermitChangeset<'a> {
    fn from(patch: &'a PermitPatch) -> Self {
        Self {
            license_plate: patch.license_plate.as_deref(),
            color: patch.color.as_deref(),
            make: patch.make.as_deref(),
            model: patch.model.as_deref(),
        }
    }
}

#[derive(Queryable, Selectable, Insertable)]
#[diesel(table_name = visitors)]
pub struct VisitorRow {
    pub id: String,
    pub resident_id: String,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub access_start: i64,
    pub access_end: i64,
}

impl TryFrom<VisitorRow> for Visitor {
    type Error = PersistenceError;

    fn try_from(row: VisitorRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            resident_id: row.resident_id,
            first_name: row.first_name,
            last_name: row.last_name,
            relationship: row.relationship,
            access_start: instant(row.access_start)?,
            access_end: instant(row.access_end)?,
        })
    }
}

impl From<&Visitor> for VisitorRow {
    fn from(visitor: &Visitor) -> Self {
        Self {
            id: visitor.id.clone(),
            resident_id: visitor.resident_id.clone(),
            first_name: visitor.first_name.clone(),
            last_name: visitor.last_name.clone(),
            relationship: visitor.relationship.clone(),
            access_start: visitor.access_start.unix_timestamp(),
            access_end: visitor.access_end.unix_timestamp(),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = admins)]
pub struct AdminRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub is_privileged: i32,
    pub token_version: i32,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password: row.password,
            is_privileged: row.is_privileged != 0,
            token_version: row.token_version,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = admins)]
pub struct NewAdminRow<'a> {
    pub id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub is_privileged: i32,
    pub token_version: i32,
}

impl<'a> From<&'a Admin> for NewAdminRow<'a> {
    fn from(admin: &'a Admin) -> Self {
        Self {
            id: &admin.id,
            first_name: &admin.first_name,
            last_name: &admin.last_name,
            email: &admin.email,
            password: &admin.password,
            is_privileged: flag(admin.is_privileged),
            token_version: admin.token_version,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = admins)]
pub struct AdminChangeset<'a> {
    pub password: Option<&'a str>,
    pub token_version: Option<i32>,
}

impl<'a> From<&'a AdminPatch> for AdminChangeset<'a> {
    fn from(patch: &'a AdminPatch) -> Self {
        Self {
            password: patch.password.as_deref(),
            token_version: patch.token_version,
        }
    }
}
