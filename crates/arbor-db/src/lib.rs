pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads; foreign_keys drives the post
        // deletion cascade.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<anyhow::Error>,
        F: FnOnce(&Connection) -> Result<T, E>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run `f` as one transaction: committed when it returns Ok, rolled back
    /// when it returns Err. Everything an operation writes, including the
    /// notifications it emits, persists or vanishes together.
    pub fn with_tx<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<anyhow::Error>,
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        let tx = conn.transaction().map_err(anyhow::Error::from)?;
        let out = f(&tx)?;
        tx.commit().map_err(anyhow::Error::from)?;
        Ok(out)
    }
}
