//! Partition lifetime: creation, enumeration and deletion.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// Handle to an open cache partition.
///
/// Only obtainable through [`CacheDb::open_partition`], so holding one means
/// the partition existed when it was opened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    pub(crate) name: String,
}

impl Partition {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Partition name with its entry count.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PartitionStats {
    pub name: String,
    pub entries: u64,
}

impl CacheDb {
    /// Open a partition, creating it if absent.
    pub async fn open_partition(&self, name: &str) -> Result<Partition, Error> {
        let name = name.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        let partition_name = name.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO partitions (name, created_at) VALUES (?1, ?2)",
                    params![partition_name, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(Partition { name })
    }

    /// Whether a partition with this name exists.
    pub async fn has_partition(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM partitions WHERE name = ?1)",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// Names of all partitions, in creation order.
    pub async fn partitions(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM partitions ORDER BY rowid ASC")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Every partition with its entry count.
    pub async fn partition_stats(&self) -> Result<Vec<PartitionStats>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<PartitionStats>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT p.name, COUNT(e.id) FROM partitions p
                     LEFT JOIN entries e ON e.partition = p.name
                     GROUP BY p.name ORDER BY p.rowid ASC",
                )?;
                let stats = stmt
                    .query_map([], |row| {
                        Ok(PartitionStats { name: row.get(0)?, entries: row.get::<_, i64>(1)? as u64 })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(stats)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete one partition and all of its entries.
    ///
    /// Returns false if no such partition existed.
    pub async fn delete_partition(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM partitions WHERE name = ?1", params![name])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every partition whose name is not in `keep`.
    ///
    /// Returns the names that were deleted.
    pub async fn delete_all_except(&self, keep: &[String]) -> Result<Vec<String>, Error> {
        let keep = keep.to_vec();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let tx = conn.transaction()?;
                let stale: Vec<String> = {
                    let mut stmt = tx.prepare("SELECT name FROM partitions ORDER BY rowid ASC")?;
                    stmt.query_map([], |row| row.get::<_, String>(0))?
                        .collect::<Result<Vec<_>, _>>()?
                        .into_iter()
                        .filter(|name| !keep.contains(name))
                        .collect()
                };
                for name in &stale {
                    tx.execute("DELETE FROM partitions WHERE name = ?1", params![name])?;
                }
                tx.commit()?;
                Ok(stale)
            })
            .await
            .map_err(Error::from)
    }
}
