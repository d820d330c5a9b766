//! Persistence-facing package for natter.
//!
//! Only the [`Controller`] (plus its error and clock types) is exported. The
//! DAO, schema and row mapping stay private so that nothing outside this crate
//! can reach the database except through the controller.

mod clock;
mod controller;
mod dao;
mod error;
mod migrations;
mod models;
mod queries;
mod validation;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

pub use clock::{Clock, SystemClock};
pub use controller::{Controller, SESSION_TTL_HOURS};
pub use error::{ControllerError, ValidationError};

/// Where the controller keeps its SQLite database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Private in-memory database, gone when the controller is dropped.
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }
}

pub(crate) struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}
