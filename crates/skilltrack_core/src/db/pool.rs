//! Fixed-size SQLite connection pool.
//!
//! # Responsibility
//! - Own every store connection used by the request path.
//! - Hand out one connection per blocking unit of work.
//!
//! # Invariants
//! - Pool size is fixed at construction and never zero.
//! - All pooled connections point at the same database and are migrated.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::info;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin pool of migrated SQLite connections.
pub struct DbPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl DbPool {
    /// Opens `size` connections to the database file at `path`.
    ///
    /// The first connection applies pending migrations; the rest observe the
    /// migrated schema.
    pub fn open(path: impl AsRef<Path>, size: usize) -> DbResult<Self> {
        if size == 0 {
            return Err(DbError::InvalidPoolSize(size));
        }

        let path = path.as_ref();
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            connections.push(Mutex::new(open_db(path)?));
        }
        info!(
            "event=db_pool_open module=db status=ok mode=file size={}",
            size
        );
        Ok(Self::from_connections(connections))
    }

    /// Opens a single-connection pool over a private in-memory database.
    ///
    /// In-memory databases are per-connection, so the pool cannot grow.
    pub fn in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::from_connections(vec![Mutex::new(conn)]))
    }

    /// Number of connections owned by the pool.
    pub fn size(&self) -> usize {
        self.connections.len()
    }

    /// Acquires a connection, preferring an idle one.
    ///
    /// Blocks on the round-robin slot when every connection is busy.
    pub fn acquire(&self) -> MutexGuard<'_, Connection> {
        let len = self.connections.len();
        let start = self.next.fetch_add(1, Ordering::Relaxed) % len;
        for offset in 0..len {
            if let Some(guard) = self.connections[(start + offset) % len].try_lock() {
                return guard;
            }
        }
        self.connections[start].lock()
    }

    fn from_connections(connections: Vec<Mutex<Connection>>) -> Self {
        Self {
            connections,
            next: AtomicUsize::new(0),
        }
    }
}
