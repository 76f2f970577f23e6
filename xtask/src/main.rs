// Copyright (C) 2024-2026 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Project automation for the guest parking workspace.
//!
//! - `cargo xtask test` runs every standard test against in-memory `SQLite`.
//! - `cargo xtask test-mariadb` starts a throwaway `MariaDB` container and
//!   runs the ignored backend validation tests in `parking-persistence`
//!   against it.
//! - `cargo xtask verify-migrations` applies both migration sets and fails
//!   if the resulting schemas differ.
//!
//! Standard `cargo test` never needs Docker; external databases are opt-in.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::thread::sleep;
use std::time::Duration;
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::Text;
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without warnings for every default package
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Run lib, bin and doc tests for the workspace's default packages
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

// ============================================================================
// MariaDB orchestration
// ============================================================================

/// A disposable `MariaDB` container reachable on a local port.
///
/// Dropping the value stops and removes the container, so cleanup happens
/// whether the work inside succeeded or not.
struct MariaDbContainer {
    name: &'static str,
    database_url: String,
}

impl MariaDbContainer {
    const USER: &'static str = "parking";
    const PASSWORD: &'static str = "test_password";
    const DATABASE: &'static str = "parking_test";
    const READY_ATTEMPTS: u32 = 30;

    fn start(name: &'static str, port: u16) -> Result<Self> {
        tracing::info!("Checking Docker availability");
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        Self::remove(name);

        tracing::info!("Starting MariaDB container: {name}");
        cmd!(
            "docker",
            "run",
            "--name",
            name,
            "-e",
            format!("MARIADB_DATABASE={}", Self::DATABASE),
            "-e",
            format!("MARIADB_USER={}", Self::USER),
            "-e",
            format!("MARIADB_PASSWORD={}", Self::PASSWORD),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{port}:3306"),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        let container = Self {
            name,
            database_url: format!(
                "mysql://{}:{}@127.0.0.1:{port}/{}",
                Self::USER,
                Self::PASSWORD,
                Self::DATABASE
            ),
        };
        container.wait_until_ready()?;
        Ok(container)
    }

    fn wait_until_ready(&self) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        for attempt in 1..=Self::READY_ATTEMPTS {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/{}", Self::READY_ATTEMPTS);

            let probe = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                Self::USER,
                format!("-p{}", Self::PASSWORD),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();

            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within timeout"))
    }

    fn remove(name: &str) {
        let _ = cmd!("docker", "stop", name).stdout_null().stderr_null().run();
        let _ = cmd!("docker", "rm", name).stdout_null().stderr_null().run();
    }
}

impl Drop for MariaDbContainer {
    fn drop(&mut self) {
        tracing::info!("Stopping MariaDB container: {}", self.name);
        Self::remove(self.name);
    }
}

/// Run `MariaDB` backend validation tests
///
/// Runs the ignored `backend_validation_tests` of `parking-persistence` with
/// `DATABASE_URL` and `PARKING_TEST_BACKEND=mariadb` set. Port 3307 must be
/// free.
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");
    let container = MariaDbContainer::start("parking-test-mariadb", 3307)?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        "parking-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", &container.database_url)
    .env("PARKING_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

// ============================================================================
// Schema parity
// ============================================================================

/// Table name to columns, each column reduced to a coarse type and nullability.
type Schema = BTreeMap<String, BTreeMap<String, Column>>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    normalized_type: &'static str,
    nullable: bool,
}

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    data_type: String,
    #[diesel(sql_type = Text)]
    is_nullable: String,
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// Applies `migrations/` to an in-memory `SQLite` database and
/// `migrations_mysql/` to a throwaway `MariaDB`, then compares tables,
/// columns, coarse column types and nullability. Port 3308 must be free.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");
    let container = MariaDbContainer::start("parking-verify-migrations", 3308)?;

    tracing::info!("Applying SQLite migrations");
    let mut sqlite_conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;

    tracing::info!("Applying MySQL migrations");
    let mut mysql_conn = MysqlConnection::establish(&container.database_url)
        .wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;

    let sqlite_rows: Vec<ColumnRow> = diesel::sql_query(
        "SELECT m.name AS table_name, p.name AS column_name, p.type AS data_type, \
         CASE WHEN p.\"notnull\" = 0 AND p.pk = 0 THEN 'YES' ELSE 'NO' END AS is_nullable \
         FROM sqlite_master m JOIN pragma_table_info(m.name) p \
         WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%' \
         AND m.name != '__diesel_schema_migrations'",
    )
    .load(&mut sqlite_conn)
    .wrap_err("Failed to introspect SQLite schema")?;

    let mysql_rows: Vec<ColumnRow> = diesel::sql_query(
        "SELECT CAST(table_name AS CHAR) AS table_name, \
         CAST(column_name AS CHAR) AS column_name, \
         CAST(data_type AS CHAR) AS data_type, \
         CAST(is_nullable AS CHAR) AS is_nullable \
         FROM information_schema.columns \
         WHERE table_schema = DATABASE() AND table_name != '__diesel_schema_migrations'",
    )
    .load(&mut mysql_conn)
    .wrap_err("Failed to introspect MySQL schema")?;

    let mismatches: Vec<String> = compare_schemas(
        &collect_schema(sqlite_rows),
        &collect_schema(mysql_rows),
    );
    if !mismatches.is_empty() {
        return Err(eyre!(
            "Schema parity check FAILED\n{}",
            mismatches.join("\n")
        ));
    }

    tracing::info!("Schema parity verification passed");
    Ok(())
}

fn collect_schema(rows: Vec<ColumnRow>) -> Schema {
    let mut schema = Schema::new();
    for row in rows {
        schema.entry(row.table_name).or_default().insert(
            row.column_name,
            Column {
                normalized_type: normalize_type(&row.data_type),
                nullable: row.is_nullable.eq_ignore_ascii_case("YES"),
            },
        );
    }
    schema
}

/// Collapses backend-specific type names onto `integer`, `real`, `blob`
/// or `text`.
fn normalize_type(data_type: &str) -> &'static str {
    let upper = data_type.to_uppercase();
    if upper.contains("INT") || upper.starts_with("BOOL") {
        "integer"
    } else if ["REAL", "FLOA", "DOUB", "DECIMAL", "NUMERIC"]
        .iter()
        .any(|name| upper.contains(name))
    {
        "real"
    } else if upper.contains("BLOB") || upper.contains("BINARY") {
        "blob"
    } else {
        "text"
    }
}

fn compare_schemas(sqlite: &Schema, mysql: &Schema) -> Vec<String> {
    let mut mismatches: Vec<String> = Vec::new();
    let tables: BTreeSet<&String> = sqlite.keys().chain(mysql.keys()).collect();

    for table in tables {
        let (Some(sqlite_columns), Some(mysql_columns)) = (sqlite.get(table), mysql.get(table))
        else {
            mismatches.push(format!("  - Table '{table}' exists on only one backend"));
            continue;
        };

        let columns: BTreeSet<&String> =
            sqlite_columns.keys().chain(mysql_columns.keys()).collect();
        for column in columns {
            match (sqlite_columns.get(column), mysql_columns.get(column)) {
                (Some(lite), Some(my)) if lite != my => mismatches.push(format!(
                    "  - Column '{table}.{column}' differs: SQLite {lite:?}, MySQL {my:?}"
                )),
                (Some(_), Some(_)) => {}
                _ => mismatches.push(format!(
                    "  - Column '{table}.{column}' exists on only one backend"
                )),
            }
        }
    }

    mismatches
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
