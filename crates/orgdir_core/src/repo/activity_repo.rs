//! Activity tree repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look up activity nodes by case-insensitive name.
//! - Expose one-hop parent/child adjacency for bounded traversal.
//!
//! # Invariants
//! - Name matching compares `casefold(name)` with an already folded term.
//! - No primitive here recurses; depth is owned by the resolver.

use crate::db::CASEFOLD_FN;
use crate::model::activity::{Activity, ActivityId};
use crate::repo::{ensure_connection_ready, query_in_chunks, RepoResult};
use rusqlite::{Connection, Row};

const ACTIVITY_COLUMNS: &[&str] = &["id", "name", "parent_id"];

/// Repository interface for activity tree reads.
pub trait ActivityRepository {
    /// Finds activities whose folded name equals `folded_name`.
    fn find_by_name(&self, folded_name: &str) -> RepoResult<Vec<Activity>>;
    /// Lists direct children of any of `parent_ids`.
    fn list_children(&self, parent_ids: &[ActivityId]) -> RepoResult<Vec<Activity>>;
    /// Loads activities by id. Unknown ids are skipped.
    fn load_activities(&self, ids: &[ActivityId]) -> RepoResult<Vec<Activity>>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("activities", ACTIVITY_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn find_by_name(&self, folded_name: &str) -> RepoResult<Vec<Activity>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, parent_id
             FROM activities
             WHERE {CASEFOLD_FN}(name) = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([folded_name])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_activity_row(row)?);
        }
        Ok(items)
    }

    fn list_children(&self, parent_ids: &[ActivityId]) -> RepoResult<Vec<Activity>> {
        query_in_chunks(
            self.conn,
            "SELECT id, name, parent_id
             FROM activities
             WHERE parent_id IN ({keys})
             ORDER BY id ASC;",
            parent_ids,
            parse_activity_row,
        )
    }

    fn load_activities(&self, ids: &[ActivityId]) -> RepoResult<Vec<Activity>> {
        query_in_chunks(
            self.conn,
            "SELECT id, name, parent_id
             FROM activities
             WHERE id IN ({keys})
             ORDER BY id ASC;",
            ids,
            parse_activity_row,
        )
    }
}

pub(crate) fn parse_activity_row(row: &Row<'_>) -> RepoResult<Activity> {
    Ok(Activity {
        id: row.get("id")?,
        name: row.get("name")?,
        parent_id: row.get("parent_id")?,
    })
}
