//! Key-value repository

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::params;

use crate::db::Database;

pub struct KvRepository {
    db: Database,
}

impl KvRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get the raw value stored under a key
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.db.lock().await;
        let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;

        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read key {}", key)),
        }
    }

    /// Insert or replace the value under a key
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.db.lock().await;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )
        .with_context(|| format!("Failed to write key {}", key))?;

        tracing::debug!("Wrote {} ({} bytes)", key, value.len());
        Ok(())
    }
}
