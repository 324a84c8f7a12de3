//! Core types and shared functionality for swcache.
//!
//! This crate provides:
//! - Request/response model and the `Network` seam
//! - Cache partitions with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;

pub use cache::{CacheDb, CachedResponse, Partition, PartitionStats};
pub use config::{AppConfig, ConfigError, PartitionKind};
pub use error::Error;
pub use http::{Network, Request, Response};
