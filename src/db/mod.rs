//! Database module

pub mod schema;
pub mod connection;
pub mod kv;
pub mod repositories;

pub use connection::Database;
pub use kv::{KeyValueStore, MemoryKvStore};
pub use repositories::kv::KvRepository;
