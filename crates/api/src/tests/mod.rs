// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod account_tests;

use parking_domain::{Car, CarFields, Resident};
use parking_persistence::Persistence;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::CreatePermitRequest;

/// Fixed reference instant used as "now" throughout the tests.
pub const NOW: OffsetDateTime = datetime!(2026-03-10 12:00 UTC);

pub const RESIDENT_ID: &str = "B1234567";
pub const CAR_ID: &str = "6f1c2a3e-8b4d-4c5e-9f60-1a2b3c4d5e6f";
pub const OTHER_CAR_ID: &str = "0d9e8f7a-6b5c-4d3e-a2f1-0a1b2c3d4e5f";

/// Midnight `offset` days from the reference day.
pub fn day(offset: i64) -> OffsetDateTime {
    datetime!(2026-03-10 00:00 UTC) + Duration::days(offset)
}

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin"), Role::Admin)
}

pub fn resident_actor(id: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(id.to_string(), Role::Resident)
}

pub fn new_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
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

/// A database with resident `B1234567`, who has used `days_used` days and
/// owns car `CAR_ID`.
pub fn setup(days_used: i32) -> Persistence {
    let mut persistence = new_persistence();
    let mut resident = create_test_resident(RESIDENT_ID);
    resident.amt_parking_days_used = days_used;
    persistence.create_resident(&resident).unwrap();
    persistence
        .create_car(&create_test_car(CAR_ID, RESIDENT_ID, "ABC123"))
        .unwrap();
    persistence
}

/// A request for an existing car over `[start, end]`.
pub fn permit_request(car_id: &str, start: OffsetDateTime, end: OffsetDateTime) -> CreatePermitRequest {
    CreatePermitRequest {
        resident_id: RESIDENT_ID.to_string(),
        car_id: car_id.to_string(),
        car: CarFields::default(),
        start_date: Some(start),
        end_date: Some(end),
        exception_reason: None,
    }
}

/// A request that registers a new car inline.
pub fn new_car_request(plate: &str, start: OffsetDateTime, end: OffsetDateTime) -> CreatePermitRequest {
    CreatePermitRequest {
        car: CarFields {
            license_plate: plate.to_string(),
            color: String::from("blue"),
            make: String::from("honda"),
            model: String::from("civic"),
        },
        ..permit_request("", start, end)
    }
}

pub fn resident_days(persistence: &mut Persistence, id: &str) -> i32 {
    persistence.get_resident(id).unwrap().unwrap().amt_parking_days_used
}

pub fn car_days(persistence: &mut Persistence, id: &str) -> i32 {
    persistence.get_car(id).unwrap().unwrap().amt_parking_days_used
}
