//! Database connection management
//!
//! NOTE: This uses synchronous rusqlite behind a tokio::Mutex. Every write
//! re-serializes a whole collection, so statements are short and the lock
//! is never held across an await on anything other than itself.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::schema::SCHEMA;

const IN_MEMORY: &str = ":memory:";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: String,
}

impl Database {
    /// Open (or create) a database file and apply the schema
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;

        let db = Self::init(conn, path.to_string_lossy().to_string())?;
        info!("Database initialized at {:?}", path);
        Ok(db)
    }

    /// Open a throwaway database that lives as long as this handle
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn, IN_MEMORY.to_string())
    }

    fn init(conn: Connection, path: String) -> Result<Self> {
        conn.execute_batch(SCHEMA).context("Failed to initialize schema")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Get a locked connection
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }

    /// Get the database path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Check if database is accessible
    pub async fn health_check(&self) -> Result<bool> {
        let conn = self.lock().await;
        match conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)) {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            path: self.path.clone(),
        }
    }
}
