//! # isfri - Is It Friday?
//!
//! A read-only device node that tells you whether the current UTC day is Friday.
//!
//! ## Features
//!
//! - **Exclusive Access**: One open session at a time, enforced by a lock-free gate; a second opener gets `Busy`.
//! - **Chunked Reads**: The answer is served through an offset cursor in reads of any size, ending with a zero-byte read.
//! - **Read-Only**: Every write is refused with `UnsupportedOperation`.
//! - **UTC Only**: The weekday always comes from the UTC calendar date.
//! - **TCP Device Node**: A Tokio server stands in for the operating system, one connection per session.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use isfri::config::Config;
//! use isfri::device::DeviceEndpoint;
//! use isfri::host::server::DeviceServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let server = DeviceServer::bind(config, Arc::new(DeviceEndpoint::new())).await?;
//!     server.run().await
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`device`] - The device core: weekday selection, exclusivity gate, read cursor, hooks
//! - [`host`] - TCP device node and probe client
//! - [`config`] - Configuration management
//! - [`metrics`] - Host-side activity counters
//! - [`logutil`] - Log escaping helpers

pub mod config;
pub mod device;
pub mod host;
pub mod logutil;
pub mod metrics;
