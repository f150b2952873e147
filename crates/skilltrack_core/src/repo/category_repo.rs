//! Read-only access to the externally managed category vocabulary.
//!
//! # Invariants
//! - This repository never writes to `metadata`.
//! - Matching is exact and case-sensitive on both `type` and `value`.

use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::Connection;

/// Lookup contract for controlled-vocabulary entries.
pub trait CategoryRepository {
    /// Returns whether an active entry `(entry_type, value)` exists.
    fn is_active_entry(&self, entry_type: &str, value: &str) -> RepoResult<bool>;
}

/// SQLite-backed vocabulary lookup over the `metadata` table.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn is_active_entry(&self, entry_type: &str, value: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM metadata
                WHERE type = ?1
                  AND value = ?2
                  AND is_active = 1
            );",
            [entry_type, value],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}
