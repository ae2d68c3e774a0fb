//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for one scoped operation.
//! - Configure connection pragmas required by the vocabulary store.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.
//! - `open_existing_db` never creates a database file.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns whether a vocabulary database file is present at `path`.
///
/// A directory or other non-file entry at `path` does not count.
pub fn database_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Creates the database file (if absent) and its schema.
///
/// Calling this on an already initialized database is a no-op. The connection
/// is closed before returning.
pub fn initialize_db(path: impl AsRef<Path>) -> DbResult<()> {
    let conn = open_db(path)?;
    drop(conn);
    Ok(())
}

/// Opens (creating if needed) a SQLite database file and applies all pending
/// migrations.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_logged("create", || Connection::open(path.as_ref()))
}

/// Opens an already initialized SQLite database file.
///
/// # Errors
/// - Returns `DbError::NotInitialized` when no database file exists at `path`.
pub fn open_existing_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if !database_exists(path) {
        info!(
            "event=db_open module=db status=error mode=existing error_code=db_not_initialized path={}",
            path.display()
        );
        return Err(DbError::NotInitialized {
            path: path.to_path_buf(),
        });
    }

    open_logged("existing", || {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    })
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged("memory", Connection::open_in_memory)
}

fn open_logged(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
