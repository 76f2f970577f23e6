// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod admin_tests;
mod backend_validation_tests;
mod resident_tests;

use parking_domain::{Admin, Car, NewPermit, Resident, Visitor};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::SqlitePersistence;

/// Fixed reference instant used as "now" throughout the tests.
pub const NOW: OffsetDateTime = datetime!(2026-03-10 12:00 UTC);

/// Midnight `offset` days from the reference day.
pub fn day(offset: i64) -> OffsetDateTime {
    datetime!(2026-03-10 00:00 UTC) + Duration::days(offset)
}

pub fn create_test_resident(id: &str) -> Resident {
    Resident {
        id: id.to_string(),
        first_name: String::from("Jane"),
        last_name: String::from("Doe"),
        phone: String::from("5555555555"),
        email: format!("{}@example.com", id.to_lowercase()),
        password: String::from("$2b$04$hashedpasswordplaceholder"),
        unlim_days: false,
        amt_parking_days_used: 0,
        token_version: 0,
    }
}

pub fn create_test_car(id: &str, resident_id: &str, plate: &str) -> Car {
    Car {
        id: id.to_string(),
        resident_id: resident_id.to_string(),
        license_plate: plate.to_string(),
        color: String::from("red"),
        make: String::from("toyota"),
        model: String::from("corolla"),
        amt_parking_days_used: 0,
    }
}

pub fn create_test_permit(car: &Car, start: OffsetDateTime, end: OffsetDateTime) -> NewPermit {
    NewPermit {
        resident_id: car.resident_id.clone(),
        car_id: car.id.clone(),
        car: car.fields(),
        start_date: start,
        end_date: end,
        request_ts: NOW,
        affects_days: true,
        exception_reason: None,
    }
}

pub fn create_test_visitor(id: &str, resident_id: &str, first_name: &str) -> Visitor {
    Visitor {
        id: id.to_string(),
        resident_id: resident_id.to_string(),
        first_name: first_name.to_string(),
        last_name: String::from("Smith"),
        relationship: String::from("fam/fri"),
        access_start: day(-1),
        access_end: day(1),
    }
}

pub fn create_test_admin(id: &str) -> Admin {
    Admin {
        id: id.to_string(),
        first_name: String::from("Ada"),
        last_name: String::from("Admin"),
        email: String::from("admin@example.com"),
        password: String::from("$2b$04$hashedpasswordplaceholder"),
        is_privileged: true,
        token_version: 0,
    }
}

/// A database with one resident (`B1234567`) owning one car (`car-1`).
pub fn setup_resident_with_car() -> (SqlitePersistence, Resident, Car) {
    let mut persistence = SqlitePersistence::new_in_memory().expect("in-memory database");
    let resident = create_test_resident("B1234567");
    persistence.create_resident(&resident).unwrap();
    let car = create_test_car("car-1", &resident.id, "ABC123");
    persistence.create_car(&car).unwrap();
    (persistence, resident, car)
}
