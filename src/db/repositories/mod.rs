//! Repositories over the SQLite connection

pub mod kv;
