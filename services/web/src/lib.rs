//! services/web/src/lib.rs
//!
//! Library surface of the `web` service: configuration, the port adapters,
//! and the HTTP layer. The `server` and `dbtool` binaries are thin shells
//! over this.

pub mod adapters;
pub mod admin;
pub mod config;
pub mod error;
pub mod web;
