// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use parking_domain::{PermitFilter, ResidentPatch, SelectOptions, VisitorFilter};

use super::{
    NOW, create_test_car, create_test_permit, create_test_resident, create_test_visitor, day,
    setup_resident_with_car,
};
use crate::{PersistenceError, SqlitePersistence};

#[test]
fn test_create_and_get_resident() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let resident = create_test_resident("B1234567");
    persistence.create_resident(&resident).unwrap();

    let stored = persistence.get_resident("B1234567").unwrap().unwrap();
    assert_eq!(stored, resident);
}

#[test]
fn test_get_missing_resident_is_none() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.get_resident("B0000000").unwrap().is_none());
}

#[test]
fn test_duplicate_resident_id_is_unique_violation() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let resident = create_test_resident("B1234567");
    persistence.create_resident(&resident).unwrap();

    let mut again = create_test_resident("B1234567");
    again.email = String::from("other@example.com");
    let err = persistence.create_resident(&again).unwrap_err();
    assert!(matches!(err, PersistenceError::UniqueViolation(_)), "{err:?}");
}

#[test]
fn test_duplicate_email_is_unique_violation() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let mut first = create_test_resident("B1234567");
    first.email = String::from("shared@example.com");
    persistence.create_resident(&first).unwrap();

    let mut second = create_test_resident("B7654321");
    second.email = String::from("shared@example.com");
    let err = persistence.create_resident(&second).unwrap_err();
    assert!(matches!(err, PersistenceError::UniqueViolation(_)), "{err:?}");
}

#[test]
fn test_get_resident_by_email_ignores_case() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence.create_resident(&create_test_resident("B1234567")).unwrap();

    let found = persistence.get_resident_by_email("B1234567@EXAMPLE.com").unwrap();
    assert_eq!(found.map(|r| r.id), Some(String::from("B1234567")));
}

#[test]
fn test_update_resident_writes_only_given_fields() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence.create_resident(&create_test_resident("B1234567")).unwrap();

    let patch = ResidentPatch {
        phone: Some(String::from("1112223333")),
        unlim_days: Some(true),
        amt_parking_days_used: Some(0),
        ..ResidentPatch::default()
    };
    persistence.update_resident("B1234567", &patch).unwrap();

    let stored = persistence.get_resident("B1234567").unwrap().unwrap();
    assert_eq!(stored.phone, "1112223333");
    assert!(stored.unlim_days);
    assert_eq!(stored.first_name, "Jane");
}

#[test]
fn test_update_missing_resident_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let patch = ResidentPatch {
        phone: Some(String::from("1112223333")),
        ..ResidentPatch::default()
    };
    let err = persistence.update_resident("B0000000", &patch).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_empty_resident_patch_is_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence.create_resident(&create_test_resident("B1234567")).unwrap();
    let err = persistence
        .update_resident("B1234567", &ResidentPatch::default())
        .unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidArgument(_)));
}

#[test]
fn test_add_resident_days_is_relative() {
    let (mut persistence, resident, _) = setup_resident_with_car();

    persistence.add_resident_days(&resident.id, 5).unwrap();
    persistence.add_resident_days(&resident.id, 3).unwrap();
    persistence.add_resident_days(&resident.id, -2).unwrap();

    let stored = persistence.get_resident(&resident.id).unwrap().unwrap();
    assert_eq!(stored.amt_parking_days_used, 6);
}

#[test]
fn test_add_days_to_missing_resident_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let err = persistence.add_resident_days("B0000000", 1).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_delete_resident_cascades() {
    let (mut persistence, resident, car) = setup_resident_with_car();
    persistence
        .create_permit(&create_test_permit(&car, day(0), day(2)))
        .unwrap();
    persistence
        .create_visitor(&create_test_visitor("visitor-1", &resident.id, "Sam"))
        .unwrap();

    persistence.delete_resident(&resident.id).unwrap();

    assert!(persistence.get_resident(&resident.id).unwrap().is_none());
    assert!(persistence.get_car(&car.id).unwrap().is_none());
    let opts = SelectOptions::new();
    assert_eq!(
        persistence
            .count_permits(&PermitFilter::for_resident(&resident.id), &opts, NOW)
            .unwrap(),
        0
    );
    let visitors = VisitorFilter {
        resident_id: Some(resident.id.clone()),
    };
    assert_eq!(persistence.count_visitors(&visitors, &opts, NOW).unwrap(), 0);
}

#[test]
fn test_delete_missing_resident_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.delete_resident("B0000000").unwrap_err().is_not_found());
}

#[test]
fn test_select_residents_search_and_paging() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    for (index, id) in ["B0000001", "B0000002", "B0000003"].iter().enumerate() {
        let mut resident = create_test_resident(id);
        if index == 1 {
            resident.last_name = String::from("Unique");
        }
        persistence.create_resident(&resident).unwrap();
    }

    let opts = SelectOptions::new().with_search("UNIQUE");
    let found = persistence.select_residents(&opts).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "B0000002");

    let page = SelectOptions::new()
        .with_limit_and_offset(2, 2)
        .with_reversed(true);
    let found = persistence.select_residents(&page).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "B0000001");
    assert_eq!(persistence.count_residents(&page).unwrap(), 3);

    let by_id = SelectOptions::new().with_search("b0000003");
    assert_eq!(persistence.count_residents(&by_id).unwrap(), 1);
}

#[test]
fn test_car_for_missing_resident_violates_foreign_key() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let err = persistence
        .create_car(&create_test_car("car-x", "B0000000", "XYZ999"))
        .unwrap_err();
    assert!(matches!(err, PersistenceError::ForeignKeyViolation(_)), "{err:?}");
}
