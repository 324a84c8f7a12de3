//! Entry operations within a partition.
//!
//! Entries are keyed by request identity. A put always replaces the whole
//! record, so a re-cached request moves to the end of the insertion order.

use super::connection::CacheDb;
use super::hash::{canonical_url, compute_request_key};
use super::partitions::Partition;
use crate::Error;
use crate::http::{Request, Response};
use bytes::Bytes;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A stored response snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub method: String,
    /// Canonical request URL.
    pub url: String,
    pub response: Response,
    pub stored_at: String,
}

struct EntryRow {
    method: String,
    url: String,
    status: u16,
    headers_json: String,
    body: Vec<u8>,
    stored_at: String,
}

impl EntryRow {
    fn decode(self) -> Result<CachedResponse, Error> {
        let headers: Vec<(String, String)> = serde_json::from_str(&self.headers_json)?;
        Ok(CachedResponse {
            method: self.method,
            url: self.url,
            response: Response { status: self.status, headers, body: Bytes::from(self.body) },
            stored_at: self.stored_at,
        })
    }
}

struct PendingEntry {
    key: String,
    method: String,
    url: String,
    status: u16,
    headers_json: String,
    body: Vec<u8>,
}

impl PendingEntry {
    fn new(request: &Request, response: &Response) -> Result<Self, Error> {
        if !response.is_success() {
            return Err(Error::NotCacheable(response.status));
        }
        Ok(Self {
            key: compute_request_key(&request.method, &request.url),
            method: request.method.clone(),
            url: canonical_url(&request.url).to_string(),
            status: response.status,
            headers_json: serde_json::to_string(&response.headers)?,
            body: response.body.to_vec(),
        })
    }

    fn insert(&self, conn: &rusqlite::Connection, partition: &str, stored_at: &str) -> Result<(), Error> {
        conn.execute(
            "INSERT OR REPLACE INTO entries (partition, key, method, url, status, headers_json, body, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                partition,
                &self.key,
                &self.method,
                &self.url,
                self.status,
                &self.headers_json,
                &self.body,
                stored_at,
            ],
        )?;
        Ok(())
    }
}

impl CacheDb {
    /// Exact lookup of a request in a partition.
    ///
    /// Returns None if the request identity has no record.
    pub async fn match_request(&self, partition: &Partition, request: &Request) -> Result<Option<CachedResponse>, Error> {
        let name = partition.name.clone();
        let key = compute_request_key(&request.method, &request.url);
        let row = self
            .conn
            .call(move |conn| -> Result<Option<EntryRow>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT method, url, status, headers_json, body, stored_at
                     FROM entries WHERE partition = ?1 AND key = ?2",
                )?;

                let result = stmt.query_row(params![name, key], |row| {
                    Ok(EntryRow {
                        method: row.get(0)?,
                        url: row.get(1)?,
                        status: row.get(2)?,
                        headers_json: row.get(3)?,
                        body: row.get(4)?,
                        stored_at: row.get(5)?,
                    })
                });

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        row.map(EntryRow::decode).transpose()
    }

    /// Store a response snapshot, replacing any record for the same request.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotCacheable` for non-2xx responses.
    pub async fn put(&self, partition: &Partition, request: &Request, response: &Response) -> Result<(), Error> {
        let entry = PendingEntry::new(request, response)?;
        let name = partition.name.clone();
        let stored_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> { entry.insert(conn, &name, &stored_at) })
            .await
            .map_err(Error::from)
    }

    /// Store several snapshots in one transaction.
    ///
    /// Either every entry is written or none is.
    pub async fn put_all(&self, partition: &Partition, entries: &[(Request, Response)]) -> Result<(), Error> {
        let pending = entries
            .iter()
            .map(|(request, response)| PendingEntry::new(request, response))
            .collect::<Result<Vec<_>, _>>()?;
        let name = partition.name.clone();
        let stored_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                for entry in &pending {
                    entry.insert(&tx, &name, &stored_at)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Remove one request's record. Returns false if there was none.
    pub async fn delete_entry(&self, partition: &Partition, request: &Request) -> Result<bool, Error> {
        let name = partition.name.clone();
        let key = compute_request_key(&request.method, &request.url);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM entries WHERE partition = ?1 AND key = ?2", params![name, key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Canonical URLs of every record in a partition, oldest put first.
    pub async fn keys(&self, partition: &Partition) -> Result<Vec<String>, Error> {
        let name = partition.name.clone();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM entries WHERE partition = ?1 ORDER BY id ASC")?;
                let urls = stmt
                    .query_map(params![name], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(urls)
            })
            .await
            .map_err(Error::from)
    }
}
