// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Connection setup, migrations, and the few statements Diesel has no DSL
//! for live here. Domain queries and mutations live in `queries/` and
//! `mutations/` and are written once for both backends.
//!
//! - `sqlite`: default for development, tests, and single-host deployments
//! - `mysql`: MySQL/MariaDB, validated via opt-in tests

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Operations that cannot be expressed in backend-agnostic Diesel DSL.
pub trait PersistenceBackend: Connection {
    /// Retrieves the ID generated by the last insert on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Opens a transaction that will write.
    ///
    /// On `SQLite` this takes the database write lock up front so two
    /// writers can never both read a counter before either updates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    fn begin_write(&mut self) -> Result<(), PersistenceError>;

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    fn commit(&mut self) -> Result<(), PersistenceError>;

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    fn rollback(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn begin_write(&mut self) -> Result<(), PersistenceError> {
        sqlite::begin_immediate(self)
    }

    fn commit(&mut self) -> Result<(), PersistenceError> {
        sqlite::commit(self)
    }

    fn rollback(&mut self) -> Result<(), PersistenceError> {
        sqlite::rollback(self)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn begin_write(&mut self) -> Result<(), PersistenceError> {
        mysql::begin(self)
    }

    fn commit(&mut self) -> Result<(), PersistenceError> {
        mysql::commit(self)
    }

    fn rollback(&mut self) -> Result<(), PersistenceError> {
        mysql::rollback(self)
    }
}
