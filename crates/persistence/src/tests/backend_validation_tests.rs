// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for `MariaDB`/`MySQL`.
//!
//! Marked `#[ignore]` and run only via `cargo xtask test-mariadb`, which
//! provisions a container and sets:
//! - `DATABASE_URL`
//! - `PARKING_TEST_BACKEND=mariadb`
//!
//! Tests fail fast if required infrastructure is missing. They share one
//! database, so every test uses its own resident ID.

use diesel::MysqlConnection;
use diesel::prelude::*;
use parking_domain::SelectOptions;
use std::env;

use super::{create_test_car, create_test_permit, create_test_resident, day};
use crate::backend::mysql;
use crate::{Persistence, PersistenceError};

/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// # Panics
///
/// Panics if `PARKING_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("PARKING_TEST_BACKEND").expect(
        "PARKING_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "PARKING_TEST_BACKEND must be 'mariadb'");
}

fn open_mariadb() -> Persistence {
    verify_mariadb_test_environment();
    Persistence::open(&get_mariadb_url()).expect("Failed to open MariaDB")
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    verify_mariadb_test_environment();
    let result = MysqlConnection::establish(&get_mariadb_url());
    assert!(result.is_ok(), "Failed to connect to MariaDB: {:?}", result.err());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_and_foreign_keys() {
    verify_mariadb_test_environment();
    let mut conn = mysql::initialize_database(&get_mariadb_url())
        .expect("Failed to initialize MariaDB database");
    assert!(mysql::verify_foreign_key_enforcement(&mut conn).is_ok());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_permit_round_trip_and_counters() {
    let mut persistence = open_mariadb();
    assert_eq!(persistence.backend_name(), "mysql");

    let resident = create_test_resident("M1000001");
    let _ = persistence.delete_resident(&resident.id);
    persistence.create_resident(&resident).unwrap();
    let car = create_test_car("mariadb-car-1", &resident.id, "MDB001");
    persistence.create_car(&car).unwrap();

    let id: i64 = persistence
        .transaction(|tx| -> Result<i64, PersistenceError> {
            tx.lock_resident(&resident.id)?;
            tx.lock_car(&car.id)?;
            let id = tx.create_permit(&create_test_permit(&car, day(0), day(2)))?;
            tx.add_resident_days(&resident.id, 2)?;
            Ok(id)
        })
        .unwrap();

    let permit = persistence.get_permit(id).unwrap().unwrap();
    assert_eq!(permit.resident_id, resident.id);
    assert_eq!(
        persistence
            .get_resident(&resident.id)
            .unwrap()
            .unwrap()
            .amt_parking_days_used,
        2
    );

    persistence.delete_resident(&resident.id).unwrap();
    assert!(persistence.get_permit(id).unwrap().is_none());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_rollback() {
    let mut persistence = open_mariadb();
    let resident = create_test_resident("M1000002");
    let _ = persistence.delete_resident(&resident.id);
    persistence.create_resident(&resident).unwrap();

    let result: Result<(), PersistenceError> = persistence.transaction(|tx| {
        tx.add_resident_days(&resident.id, 5)?;
        tx.add_car_days("mariadb-missing-car", 5)
    });
    assert!(result.is_err());
    assert_eq!(
        persistence
            .get_resident(&resident.id)
            .unwrap()
            .unwrap()
            .amt_parking_days_used,
        0
    );

    let opts = SelectOptions::new().with_search(&resident.id);
    assert_eq!(persistence.count_residents(&opts).unwrap(), 1);
    persistence.delete_resident(&resident.id).unwrap();
}
