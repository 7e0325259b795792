//! Database layer for inkpad.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization
//! and the embedded SQL migrations that create the `user` and `article`
//! tables.
//!
//! Schema creation is an explicit step: the server binary applies migrations
//! through its `migrate` command and refuses to serve while any are pending
//! (see [`pending_migrations`]).

mod migrations;
mod pool;

pub use migrations::{pending_migrations, run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
