//! SQLite-backed cache partitions.
//!
//! This module provides durable, named cache partitions using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Request-identity keys (method + canonical URL) hashed with SHA-256
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Overwrite-on-put entries and partition garbage collection

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod partitions;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::CachedResponse;
pub use partitions::{Partition, PartitionStats};
