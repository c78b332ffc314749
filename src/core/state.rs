//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::db::{Database, KvRepository};
use crate::store::{Store, StoreOptions};

pub struct AppState {
    pub db: Database,
    pub store: Store,
}

impl AppState {
    /// Hydrate a store backed by the given database
    pub async fn new(db: Database, options: StoreOptions) -> Result<Self> {
        let kv = Arc::new(KvRepository::new(db.clone()));
        let store = Store::open(kv, options).await?;
        Ok(Self { db, store })
    }

    /// Open the configured database, or `database` if given, and hydrate
    /// the store from it
    pub async fn open(
        config: &Config,
        database: Option<&str>,
        options: StoreOptions,
    ) -> Result<Self> {
        let db_path = match database {
            Some(path) => PathBuf::from(path),
            None => config.resolve_db_path()?,
        };
        let db = Database::new(&db_path)?;
        Self::new(db, options).await
    }
}
