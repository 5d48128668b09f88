#![forbid(unsafe_code)]
//! coleta-core library.
//!
//! Collection event model, the [`source::EventSource`] read interface, and
//! the SQLite store behind it.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at library boundaries, `anyhow::Result`
//!   for store plumbing.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod source;
