// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Duration, OffsetDateTime, macros::datetime};

use crate::{Permit, PermitStatus, Relationship, Resident};

fn create_test_permit(start: OffsetDateTime, end: OffsetDateTime) -> Permit {
    Permit {
        id: 7,
        resident_id: String::from("B1234567"),
        car_id: String::from("9b7f8f0e-2d4c-4c47-9a8e-1f0a6f3b5d21"),
        license_plate: String::from("ABC123"),
        color: String::from("red"),
        make: String::from("Toyota"),
        model: String::from("Corolla"),
        start_date: start,
        end_date: end,
        request_ts: start,
        affects_days: true,
        exception_reason: None,
    }
}

#[test]
fn test_permit_serializes_wire_names() {
    let start = datetime!(2026-03-01 0:00 UTC);
    let permit: Permit = create_test_permit(start, start + Duration::days(2));
    let json: serde_json::Value = serde_json::to_value(&permit).unwrap();

    assert_eq!(json["residentID"], "B1234567");
    assert_eq!(json["licensePlate"], "ABC123");
    assert_eq!(json["startDate"], "2026-03-01T00:00:00Z");
    assert_eq!(json["requestTS"], "2026-03-01T00:00:00Z");
    assert_eq!(json["affectsDays"], true);
    assert!(json["exceptionReason"].is_null());
}

#[test]
fn test_resident_never_serializes_password() {
    let resident: Resident = Resident {
        id: String::from("B1234567"),
        first_name: String::from("Ana"),
        last_name: String::from("Lopez"),
        phone: String::from("5551234"),
        email: String::from("ana@example.com"),
        password: String::from("$2b$12$hash"),
        unlim_days: false,
        amt_parking_days_used: 3,
        token_version: 4,
    };
    let json: serde_json::Value = serde_json::to_value(&resident).unwrap();

    assert!(json.get("password").is_none());
    assert!(json.get("tokenVersion").is_none());
    assert_eq!(json["amtParkingDaysUsed"], 3);
    assert!(resident.redacted().password.is_empty());
}

#[test]
fn test_permit_status_predicates() {
    let now = datetime!(2026-03-20 12:00 UTC);

    let active: Permit = create_test_permit(now - Duration::days(1), now + Duration::days(1));
    assert!(active.has_status(PermitStatus::Active, now));
    assert!(!active.has_status(PermitStatus::Expired, now));

    let expired: Permit =
        create_test_permit(datetime!(2026-03-10 0:00 UTC), datetime!(2026-03-17 0:00 UTC));
    assert!(expired.has_status(PermitStatus::Expired, now));
    assert!(!expired.has_status(PermitStatus::Active, now));

    let recent: Permit =
        create_test_permit(datetime!(2026-03-15 0:00 UTC), datetime!(2026-03-19 0:00 UTC));
    assert!(!recent.has_status(PermitStatus::Expired, now));

    let mut exception: Permit = active;
    assert!(!exception.has_status(PermitStatus::Exception, now));
    exception.exception_reason = Some(String::from("vip"));
    assert!(exception.has_status(PermitStatus::Exception, now));
    assert!(exception.has_status(PermitStatus::All, now));
}

#[test]
fn test_relationship_parse() {
    assert_eq!(Relationship::parse("fam/fri"), Some(Relationship::FamilyOrFriend));
    assert_eq!(Relationship::parse("contractor"), Some(Relationship::Contractor));
    assert_eq!(Relationship::parse("cousin"), None);
    assert_eq!(Relationship::Contractor.as_str(), "contractor");
}
