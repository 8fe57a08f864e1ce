//! services/web/src/adapters/mod.rs
//!
//! Concrete implementations of the core ports: SQLite storage and the
//! DeepSeek completion client.

pub mod completion;
pub mod db;
