//! Guide schema history.
//!
//! Steps run in version order inside one transaction, so a database is
//! either fully upgraded or left at its previous `user_version`.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OptionalExtension};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "documents",
    sql: include_str!("0001_documents.sql"),
}];

/// Table every migrated guide database must contain.
pub const DOCUMENTS_TABLE: &str = "documents";

/// Schema version recorded on a connection versus the newest this build knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    pub current: u32,
    pub latest: u32,
}

impl SchemaStatus {
    /// Names of the steps `apply_migrations` would still run, oldest first.
    pub fn pending(&self) -> Vec<&'static str> {
        MIGRATIONS
            .iter()
            .filter(|migration| migration.version > self.current)
            .map(|migration| migration.name)
            .collect()
    }

    pub fn is_current(&self) -> bool {
        self.current == self.latest
    }
}

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

pub fn schema_status(conn: &Connection) -> DbResult<SchemaStatus> {
    Ok(SchemaStatus {
        current: current_user_version(conn)?,
        latest: latest_version(),
    })
}

/// Whether the `documents` table exists, regardless of `user_version`.
pub fn has_documents_table(conn: &Connection) -> DbResult<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [DOCUMENTS_TABLE],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Brings the connection up to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build.
/// - `Migration` naming the failed step; nothing from this call is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let status = schema_status(conn)?;
    if status.current > status.latest {
        return Err(DbError::SchemaTooNew {
            found: status.current,
            supported: status.latest,
        });
    }
    if status.is_current() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > status.current) {
        let step = tx
            .execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            });
        if let Err(source) = step {
            error!(
                "event=db_migrate_step module=db status=error version={} name={} error={}",
                migration.version, migration.name, source
            );
            return Err(DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            });
        }
        info!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        status.current, status.latest
    );
    Ok(())
}
