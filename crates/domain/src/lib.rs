// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain model for the guest parking system.
//!
//! This crate owns the entities (residents, cars, permits, visitors and
//! administrators), the partial-update and filter shapes used by the
//! repositories, the composable select options, and every pure rule the
//! permit-issuance core enforces. Nothing in here performs I/O.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

pub mod constants;
mod error;
mod patch;
mod quota;
mod select;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use patch::{
    AdminPatch, CarFilter, CarPatch, PermitFilter, PermitPatch, ResidentPatch, VisitorFilter,
};
pub use quota::{
    QuotaEntity, affects_days, check_car_overlap, check_entity_days, check_permit_length,
    check_resident_overlap, permit_length_days,
};
pub use select::{DateWindow, PermitStatus, SelectOptions};
pub use types::{Admin, Car, CarFields, NewPermit, Permit, Relationship, Resident, Visitor};
pub use validation::{
    is_permit_requestor_id, is_resident_id, is_uuid_v4, validate_admin, validate_car_edit,
    validate_new_car, validate_new_resident, validate_new_visitor, validate_permit_dates,
    validate_resident_edit,
};
