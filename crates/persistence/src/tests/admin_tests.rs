// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use parking_domain::AdminPatch;

use super::create_test_admin;
use crate::{PersistenceError, SqlitePersistence};

#[test]
fn test_admin_lookup_ignores_case() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence.create_admin(&create_test_admin("Boss")).unwrap();

    let found = persistence.get_admin("BOSS").unwrap().unwrap();
    assert_eq!(found.id, "Boss");
    assert!(found.is_privileged);
    assert_eq!(persistence.count_admins().unwrap(), 1);
}

#[test]
fn test_duplicate_admin_is_unique_violation() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence.create_admin(&create_test_admin("boss")).unwrap();
    let err = persistence.create_admin(&create_test_admin("boss")).unwrap_err();
    assert!(matches!(err, PersistenceError::UniqueViolation(_)), "{err:?}");
}

#[test]
fn test_update_admin_password_and_token_version() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence.create_admin(&create_test_admin("boss")).unwrap();

    let patch = AdminPatch {
        password: Some(String::from("$2b$04$another")),
        token_version: Some(1),
    };
    persistence.update_admin("boss", &patch).unwrap();

    let stored = persistence.get_admin("boss").unwrap().unwrap();
    assert_eq!(stored.password, "$2b$04$another");
    assert_eq!(stored.token_version, 1);

    assert!(persistence.update_admin("nobody", &patch).unwrap_err().is_not_found());
    assert!(matches!(
        persistence.update_admin("boss", &AdminPatch::default()),
        Err(PersistenceError::InvalidArgument(_))
    ));
}
