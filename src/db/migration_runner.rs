use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{JournalError, Result};

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

impl Migration {
    pub fn new(version: u32, name: &'static str, sql: &'static str) -> Self {
        Self { version, name, sql }
    }

    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sql.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

pub struct MigrationRunner {
    migrations: Vec<Migration>,
}

impl MigrationRunner {
    pub fn new() -> Self {
        Self {
            migrations: Self::collect_migrations(),
        }
    }

    fn collect_migrations() -> Vec<Migration> {
        vec![
            Migration::new(0, "bootstrap", include_str!("migrations/000_bootstrap.sql")),
            Migration::new(
                1,
                "initial_schema",
                include_str!("migrations/001_initial_schema.sql"),
            ),
            Migration::new(
                2,
                "add_risk_amount",
                include_str!("migrations/002_add_risk_amount.sql"),
            ),
        ]
    }

    pub fn run_pending_migrations(&self, conn: &Connection, db_path: &str) -> Result<usize> {
        if !self.has_schema_migrations_table(conn)? {
            let bootstrap = &self.migrations[0];
            conn.execute_batch(bootstrap.sql)?;
            self.record_migration(conn, bootstrap, 0)?;
            log::info!("Bootstrapped migration tracking");
        }

        let current_version = self.get_current_version(conn)?;

        let pending: Vec<&Migration> = self
            .migrations
            .iter()
            .filter(|m| match current_version {
                Some(v) => m.version > v,
                None => m.version > 0,
            })
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        log::info!("Found {} pending migrations", pending.len());

        // Copy the database file aside before touching the schema
        let target_version = pending.last().map(|m| m.version).unwrap_or(0);
        if let Some(backup_path) = self.create_backup(db_path, target_version)? {
            log::info!("Backup created: {}", backup_path.display());
        }

        let mut applied = 0;
        for migration in pending {
            match self.apply_migration(conn, migration) {
                Ok(_) => {
                    applied += 1;
                    log::info!("Applied migration {}: {}", migration.version, migration.name);
                }
                Err(e) => {
                    log::error!("Migration {} failed: {}", migration.version, e);
                    log::error!("Database rolled back to before this migration");
                    return Err(e);
                }
            }
        }

        Ok(applied)
    }

    pub fn apply_migration(&self, conn: &Connection, migration: &Migration) -> Result<()> {
        let start = SystemTime::now();

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)?;

        let execution_time = start.elapsed().map(|d| d.as_millis() as i64).unwrap_or(0);
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, notes)
             VALUES (?, ?, ?, ?, ?, NULL)",
            params![
                migration.version,
                migration.name,
                current_timestamp(),
                migration.checksum(),
                execution_time
            ],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn record_migration(&self, conn: &Connection, migration: &Migration, execution_time: i64) -> Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, notes)
             VALUES (?, ?, ?, ?, ?, NULL)",
            params![
                migration.version,
                migration.name,
                current_timestamp(),
                migration.checksum(),
                execution_time
            ],
        )?;
        Ok(())
    }

    /// Compares stored checksums against the compiled-in migration SQL.
    /// A mismatch means a migration file changed after it was applied.
    pub fn verify_migrations(&self, conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(
            "SELECT version, name, checksum FROM schema_migrations WHERE checksum IS NOT NULL ORDER BY version",
        )?;

        let applied: Vec<(u32, String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for (version, name, stored_checksum) in applied {
            if let Some(migration) = self.migrations.iter().find(|m| m.version == version) {
                let expected = migration.checksum();
                if stored_checksum != expected {
                    log::error!(
                        "Checksum mismatch for migration {} ({}): expected {}, stored {}",
                        version,
                        name,
                        expected,
                        stored_checksum
                    );
                    return Err(JournalError::Migration(format!(
                        "checksum mismatch for migration {} ({})",
                        version, name
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn get_current_version(&self, conn: &Connection) -> Result<Option<u32>> {
        if !self.has_schema_migrations_table(conn)? {
            return Ok(None);
        }

        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .optional()?
            .flatten();

        Ok(version)
    }

    fn has_schema_migrations_table(&self, conn: &Connection) -> Result<bool> {
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_migrations'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn create_backup(&self, db_path: &str, target_version: u32) -> Result<Option<PathBuf>> {
        let source = Path::new(db_path);
        if db_path == ":memory:" || !source.exists() {
            return Ok(None);
        }

        let backup_dir = source
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| JournalError::Backup(format!("creating backup dir: {}", e)))?;

        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "journal.db".to_string());
        let backup_path = backup_dir.join(format!(
            "{}.v{}.{}.bak",
            file_name,
            target_version,
            current_timestamp()
        ));

        fs::copy(source, &backup_path)
            .map_err(|e| JournalError::Backup(format!("copying database: {}", e)))?;

        Ok(Some(backup_path))
    }
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
