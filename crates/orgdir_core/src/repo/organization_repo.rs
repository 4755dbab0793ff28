//! Organization repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Produce candidate organization ids for every lookup family.
//! - Hydrate organization records, activity links and phones in batches.
//!
//! # Invariants
//! - Candidate lists follow `title ASC, id ASC` and may repeat an id when
//!   several join rows qualify.
//! - Title/activity matching compares `casefold()` output with already
//!   folded terms.
//! - Phones are returned in creation order per organization.

use crate::db::CASEFOLD_FN;
use crate::model::activity::{Activity, ActivityId};
use crate::model::organization::{OrganizationId, OrganizationPhone, OrganizationRecord};
use crate::repo::activity_repo::parse_activity_row;
use crate::repo::{ensure_connection_ready, query_in_chunks, RepoResult};
use crate::spatial::engine::Located;
use crate::spatial::geo::BoundingBox;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row};

const REQUIRED_LAYOUT: &[(&str, &[&str])] = &[
    ("organizations", &["id", "title", "building_id"]),
    ("organization_activities", &["organization_id", "activity_id"]),
    (
        "organization_phones",
        &["id", "organization_id", "phone_number", "created_at"],
    ),
    ("buildings", &["id", "latitude", "longitude"]),
    ("activities", &["id", "name", "parent_id"]),
];

/// Repository interface for organization reads.
pub trait OrganizationRepository {
    /// Candidate ids whose folded title contains `folded_fragment`.
    fn ids_by_title_fragment(&self, folded_fragment: &str) -> RepoResult<Vec<OrganizationId>>;
    /// Candidate ids housed in `building_id`.
    fn ids_by_building(&self, building_id: &str) -> RepoResult<Vec<OrganizationId>>;
    /// Candidate ids tagged with an activity whose folded name equals
    /// `folded_name`.
    fn ids_by_activity_name(&self, folded_name: &str) -> RepoResult<Vec<OrganizationId>>;
    /// Candidate ids tagged with any of `activity_ids`.
    fn ids_by_activity_ids(&self, activity_ids: &[ActivityId]) -> RepoResult<Vec<OrganizationId>>;
    /// Organizations whose building coordinates fall inside `bbox`.
    fn locate_organizations_in_box(
        &self,
        bbox: &BoundingBox,
    ) -> RepoResult<Vec<Located<OrganizationId>>>;
    /// Loads flat organization rows. Unknown ids are skipped.
    fn load_records(&self, ids: &[OrganizationId]) -> RepoResult<Vec<OrganizationRecord>>;
    /// Loads `(organization_id, activity)` links for the given organizations.
    fn load_activity_links(
        &self,
        ids: &[OrganizationId],
    ) -> RepoResult<Vec<(OrganizationId, Activity)>>;
    /// Loads `(organization_id, phone)` rows in creation order.
    fn load_phones(&self, ids: &[OrganizationId])
        -> RepoResult<Vec<(OrganizationId, OrganizationPhone)>>;
}

/// SQLite-backed organization repository.
pub struct SqliteOrganizationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrganizationRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_LAYOUT)?;
        Ok(Self { conn })
    }

    fn query_ids(&self, sql: &str, params: &[&dyn ToSql]) -> RepoResult<Vec<OrganizationId>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }
}

impl OrganizationRepository for SqliteOrganizationRepository<'_> {
    fn ids_by_title_fragment(&self, folded_fragment: &str) -> RepoResult<Vec<OrganizationId>> {
        let pattern = format!("%{}%", escape_like(folded_fragment));
        self.query_ids(
            &format!(
                "SELECT id
                 FROM organizations
                 WHERE {CASEFOLD_FN}(title) LIKE ?1 ESCAPE '\\'
                 ORDER BY title ASC, id ASC;"
            ),
            params![pattern],
        )
    }

    fn ids_by_building(&self, building_id: &str) -> RepoResult<Vec<OrganizationId>> {
        self.query_ids(
            "SELECT id
             FROM organizations
             WHERE building_id = ?1
             ORDER BY title ASC, id ASC;",
            params![building_id],
        )
    }

    fn ids_by_activity_name(&self, folded_name: &str) -> RepoResult<Vec<OrganizationId>> {
        self.query_ids(
            &format!(
                "SELECT o.id
                 FROM organizations o
                 INNER JOIN organization_activities oa ON oa.organization_id = o.id
                 INNER JOIN activities a ON a.id = oa.activity_id
                 WHERE {CASEFOLD_FN}(a.name) = ?1
                 ORDER BY o.title ASC, o.id ASC;"
            ),
            params![folded_name],
        )
    }

    fn ids_by_activity_ids(&self, activity_ids: &[ActivityId]) -> RepoResult<Vec<OrganizationId>> {
        query_in_chunks(
            self.conn,
            "SELECT o.id
             FROM organizations o
             INNER JOIN organization_activities oa ON oa.organization_id = o.id
             WHERE oa.activity_id IN ({keys})
             ORDER BY o.title ASC, o.id ASC;",
            activity_ids,
            |row| Ok(row.get(0)?),
        )
    }

    fn locate_organizations_in_box(
        &self,
        bbox: &BoundingBox,
    ) -> RepoResult<Vec<Located<OrganizationId>>> {
        let mut stmt = self.conn.prepare(
            "SELECT o.id AS id, b.latitude AS latitude, b.longitude AS longitude
             FROM organizations o
             INNER JOIN buildings b ON b.id = o.building_id
             WHERE b.latitude BETWEEN ?1 AND ?2
               AND b.longitude BETWEEN ?3 AND ?4
             ORDER BY o.id ASC;",
        )?;
        let mut rows = stmt.query(params![
            bbox.min_lat,
            bbox.max_lat,
            bbox.min_lon,
            bbox.max_lon
        ])?;

        let mut located = Vec::new();
        while let Some(row) = rows.next()? {
            located.push(Located::new(
                row.get("id")?,
                row.get("latitude")?,
                row.get("longitude")?,
            ));
        }
        Ok(located)
    }

    fn load_records(&self, ids: &[OrganizationId]) -> RepoResult<Vec<OrganizationRecord>> {
        query_in_chunks(
            self.conn,
            "SELECT id, title, building_id
             FROM organizations
             WHERE id IN ({keys});",
            ids,
            parse_record_row,
        )
    }

    fn load_activity_links(
        &self,
        ids: &[OrganizationId],
    ) -> RepoResult<Vec<(OrganizationId, Activity)>> {
        query_in_chunks(
            self.conn,
            "SELECT oa.organization_id AS organization_id,
                    a.id AS id,
                    a.name AS name,
                    a.parent_id AS parent_id
             FROM organization_activities oa
             INNER JOIN activities a ON a.id = oa.activity_id
             WHERE oa.organization_id IN ({keys})
             ORDER BY oa.organization_id ASC, a.id ASC;",
            ids,
            |row| Ok((row.get("organization_id")?, parse_activity_row(row)?)),
        )
    }

    fn load_phones(
        &self,
        ids: &[OrganizationId],
    ) -> RepoResult<Vec<(OrganizationId, OrganizationPhone)>> {
        query_in_chunks(
            self.conn,
            "SELECT organization_id, id, phone_number
             FROM organization_phones
             WHERE organization_id IN ({keys})
             ORDER BY organization_id ASC, created_at ASC, rowid ASC;",
            ids,
            |row| {
                Ok((
                    row.get("organization_id")?,
                    OrganizationPhone {
                        id: row.get("id")?,
                        phone_number: row.get("phone_number")?,
                    },
                ))
            },
        )
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<OrganizationRecord> {
    Ok(OrganizationRecord {
        id: row.get("id")?,
        title: row.get("title")?,
        building_id: row.get("building_id")?,
    })
}

/// Escapes LIKE wildcards so a fragment matches literally under
/// `ESCAPE '\'`.
pub(crate) fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("аптека"), "аптека");
    }
}
