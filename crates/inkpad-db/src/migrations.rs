//! Embedded SQL migration runner.
//!
//! Migrations are SQL files embedded at compile time and tracked by the
//! `_inkpad_migrations` table. Each one runs exactly once, inside its own
//! transaction; already-applied migrations are skipped, so running the whole
//! list again is a no-op.

use rusqlite::Connection;
use thiserror::Error;

/// A single embedded migration.
struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// All migrations in order. New migrations are appended here.
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "000_init",
        sql: include_str!("migrations/000_init.sql"),
    },
    Migration {
        name: "001_user",
        sql: include_str!("migrations/001_user.sql"),
    },
    Migration {
        name: "002_article",
        sql: include_str!("migrations/002_article.sql"),
    },
];

const TRACKING_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS _inkpad_migrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);";

/// Errors that can occur during migration execution.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A SQL statement within a migration failed.
    #[error("migration '{name}' failed: {source}")]
    ExecutionFailed {
        /// The name of the migration that failed.
        name: String,
        /// The underlying SQLite error.
        source: rusqlite::Error,
    },

    /// Failed to query migration state.
    #[error("failed to check migration state: {0}")]
    StateQuery(rusqlite::Error),
}

/// Runs all pending migrations against the given connection.
///
/// Returns the number of migrations applied by this call.
///
/// # Errors
///
/// Returns `MigrationError` if any migration fails to execute or if the
/// migration tracking table cannot be queried.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    run_migrations_from_list(conn, MIGRATIONS)
}

/// Counts the embedded migrations that have not been applied yet.
///
/// Does not create or modify anything, so it is safe to call against a
/// database the process has never seen.
///
/// # Errors
///
/// Returns `MigrationError::StateQuery` if the schema cannot be inspected.
pub fn pending_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    pending_from_list(conn, MIGRATIONS)
}

fn pending_from_list(conn: &Connection, migrations: &[Migration]) -> Result<usize, MigrationError> {
    let tracked: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_inkpad_migrations')",
            [],
            |row| row.get(0),
        )
        .map_err(MigrationError::StateQuery)?;

    if !tracked {
        return Ok(migrations.len());
    }

    let mut pending = 0;
    for migration in migrations {
        if !is_applied(conn, migration.name)? {
            pending += 1;
        }
    }
    Ok(pending)
}

fn is_applied(conn: &Connection, name: &str) -> Result<bool, MigrationError> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM _inkpad_migrations WHERE name = ?1",
        [name],
        |row| row.get(0),
    )
    .map_err(MigrationError::StateQuery)
}

fn run_migrations_from_list(
    conn: &Connection,
    migrations: &[Migration],
) -> Result<usize, MigrationError> {
    // The tracking table has to exist before we can ask what has been applied.
    conn.execute_batch(TRACKING_TABLE_DDL)
        .map_err(|e| MigrationError::ExecutionFailed {
            name: "_inkpad_migrations_bootstrap".to_string(),
            source: e,
        })?;

    let mut applied = 0;

    for migration in migrations {
        if is_applied(conn, migration.name)? {
            tracing::debug!(
                migration = migration.name,
                "migration already applied, skipping"
            );
            continue;
        }

        tracing::info!(migration = migration.name, "applying migration");

        let failed = |e| MigrationError::ExecutionFailed {
            name: migration.name.to_string(),
            source: e,
        };

        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(migration.sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO _inkpad_migrations (name) VALUES (?1)",
            [migration.name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        applied += 1;
    }

    Ok(applied)
}
