// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partial updates and equality filters.
//!
//! Every field is optional: `None` leaves the column alone (for a patch)
//! or unconstrained (for a filter). `Some(0)` and `Some(false)` are real
//! values and are written or matched.

/// Partial update of a resident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Already-hashed password.
    pub password: Option<String>,
    pub unlim_days: Option<bool>,
    pub amt_parking_days_used: Option<i32>,
    pub token_version: Option<i32>,
}

impl ResidentPatch {
    /// True when no column would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.unlim_days.is_none()
            && self.amt_parking_days_used.is_none()
            && self.token_version.is_none()
    }
}

/// Partial update of a car's display fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarPatch {
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub amt_parking_days_used: Option<i32>,
}

impl CarPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.license_plate.is_none()
            && self.color.is_none()
            && self.make.is_none()
            && self.model.is_none()
            && self.amt_parking_days_used.is_none()
    }
}

/// Partial update of a permit's car snapshot. Nothing else on a permit is editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermitPatch {
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
}

impl PermitPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.license_plate.is_none()
            && self.color.is_none()
            && self.make.is_none()
            && self.model.is_none()
    }

    /// The same fields seen as a car edit, for validation.
    #[must_use]
    pub fn as_car_patch(&self) -> CarPatch {
        CarPatch {
            license_plate: self.license_plate.clone(),
            color: self.color.clone(),
            make: self.make.clone(),
            model: self.model.clone(),
            amt_parking_days_used: None,
        }
    }
}

/// Partial update of an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPatch {
    pub password: Option<String>,
    pub token_version: Option<i32>,
}

/// Equality constraints on permits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermitFilter {
    pub resident_id: Option<String>,
    pub car_id: Option<String>,
    /// `Some(true)` keeps only exceptions, `Some(false)` only regular permits.
    pub exception: Option<bool>,
}

impl PermitFilter {
    #[must_use]
    pub fn for_resident(resident_id: &str) -> Self {
        Self {
            resident_id: Some(resident_id.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_car(car_id: &str) -> Self {
        Self {
            car_id: Some(car_id.to_string()),
            ..Self::default()
        }
    }
}

/// Equality constraints on cars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarFilter {
    pub resident_id: Option<String>,
    pub license_plate: Option<String>,
}

/// Equality constraints on visitors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorFilter {
    pub resident_id: Option<String>,
}
