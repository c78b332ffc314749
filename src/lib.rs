//! Orquestrador - agent configuration and chat state, persisted to a local key-value store

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod store;
