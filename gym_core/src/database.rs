//! SQLite store handle.
//!
//! A [`Database`] owns one connection behind a mutex so a single instance can
//! be shared by every caller in the process. Opening a fresh store creates the
//! schema and seeds the built-in catalog in one transaction; any failure there
//! leaves the caller without a store.

use crate::catalog::{get_default_catalog, Catalog};
use crate::schema::{CURRENT_VERSION, SCHEMA};
use crate::{Config, Error, Result};
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Busy timeout used when no configuration is supplied
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Shared handle to the GymTrack store
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open the database file named by the configuration.
    pub fn open_with_config(config: &Config) -> Result<Self> {
        Self::open_with_timeout(
            &config.db_path(),
            Duration::from_millis(config.database.busy_timeout_ms),
        )
    }

    fn open_with_timeout(path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        initialize(&mut conn, get_default_catalog())?;

        tracing::info!("Opened database at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with_catalog(get_default_catalog())
    }

    /// Open an in-memory database seeded from a custom catalog.
    pub fn open_in_memory_with_catalog(catalog: &Catalog) -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        initialize(&mut conn, catalog)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a closure with exclusive access to the connection.
    ///
    /// The lock is held for the whole closure, so everything it does is one
    /// critical section with respect to other callers of this handle.
    pub(crate) fn with_conn<F, T>(&self, func: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        func(&mut conn)
    }

    /// Current schema version recorded in the file
    pub fn schema_version(&self) -> Result<i32> {
        self.with_conn(|conn| schema_version(conn))
    }
}

fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

/// Create tables and seed the catalog if the store has never been initialized.
fn initialize(conn: &mut Connection, catalog: &Catalog) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;

    let version = schema_version(conn)?;
    if version >= CURRENT_VERSION {
        tracing::debug!("Database already at schema version {}", version);
        return Ok(());
    }

    // Another connection may have initialized the file since the check above
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let version = schema_version(&tx)?;
    if version >= CURRENT_VERSION {
        tracing::debug!("Database initialized concurrently at version {}", version);
        return Ok(());
    }
    tx.execute_batch(SCHEMA)
        .map_err(|e| Error::Seed(format!("Failed to create schema: {}", e)))?;
    catalog.seed(&tx)?;
    tx.pragma_update(None, "user_version", CURRENT_VERSION)?;
    tx.commit()?;

    tracing::info!("Database initialized at schema version {}", CURRENT_VERSION);
    Ok(())
}
