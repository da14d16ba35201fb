use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::db::migration_runner::MigrationRunner;
use crate::error::Result;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (creating if needed) the journal database at `db_path` and
    /// brings its schema up to date.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute("PRAGMA foreign_keys = ON", [])?;
        // WAL mode for better concurrency between reads and writes
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Self::migrate(conn, db_path)
    }

    /// In-memory database, mostly for tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Self::migrate(conn, ":memory:")
    }

    fn migrate(conn: Connection, db_path: &str) -> Result<Self> {
        let runner = MigrationRunner::new();

        log::info!("=== Starting database migration check ===");

        let current_version = runner.get_current_version(&conn)?;
        log::info!("Current schema version: {:?}", current_version);

        let applied = runner.run_pending_migrations(&conn, db_path)?;
        if applied > 0 {
            log::info!("Applied {} migrations", applied);
        } else {
            log::info!("Database schema is up to date");
        }

        runner.verify_migrations(&conn)?;

        if let Some(version) = runner.get_current_version(&conn)? {
            log::info!("Final schema version: {}", version);
        }

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    /// Serializes access to the single connection. A poisoned lock is
    /// recovered rather than propagated; SQLite transactions keep the
    /// data itself consistent.
    pub fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
