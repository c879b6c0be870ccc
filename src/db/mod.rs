pub mod queries;

use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::Connection;
use tokio::sync::OnceCell;

pub const DATABASE_NAME: &str = "Resortdb";
pub const COLLECTION_NAME: &str = "bookings";

pub type DbHandle = Arc<Mutex<Connection>>;

/// Process-wide store connection, opened on first use and cached after that.
///
/// Concurrent first callers wait on the same initialization, so at most one
/// connection is opened. A failed attempt leaves the cell empty and the next
/// caller tries again.
pub struct Database {
    url: String,
    handle: OnceCell<DbHandle>,
}

impl Database {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            handle: OnceCell::new(),
        }
    }

    /// Returns the shared handle, connecting first if needed.
    pub async fn handle(&self) -> anyhow::Result<DbHandle> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let conn = open(&self.url)?;
                Ok::<_, anyhow::Error>(Arc::new(Mutex::new(conn)))
            })
            .await?;
        Ok(Arc::clone(handle))
    }

    pub fn is_ready(&self) -> bool {
        self.handle.initialized()
    }
}

/// Opens the connection and makes sure the bookings collection exists.
pub fn open(url: &str) -> anyhow::Result<Connection> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .context("failed to set database pragmas")?;

    queries::ensure_collection(&conn)?;

    tracing::info!(
        database = DATABASE_NAME,
        collection = COLLECTION_NAME,
        "connected to database"
    );
    Ok(conn)
}
