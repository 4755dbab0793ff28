//! Building repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Serve coarse lat/lon box scans for the spatial engine.
//! - Hydrate building read models by id.
//!
//! # Invariants
//! - Box scans compare bounds literally; inverted bounds match nothing.
//! - Rows with out-of-range coordinates are reported as invalid data.

use crate::model::building::{Building, BuildingId};
use crate::repo::{ensure_connection_ready, query_in_chunks, RepoError, RepoResult};
use crate::spatial::engine::Located;
use crate::spatial::geo::BoundingBox;
use rusqlite::{params, Connection, Row};

const BUILDING_COLUMNS: &[&str] = &["id", "address", "latitude", "longitude"];

/// Repository interface for building reads.
pub trait BuildingRepository {
    /// Lists buildings whose coordinates fall inside `bbox`.
    fn locate_buildings_in_box(&self, bbox: &BoundingBox) -> RepoResult<Vec<Located<BuildingId>>>;
    /// Loads buildings by id. Unknown ids are skipped.
    fn load_buildings(&self, ids: &[BuildingId]) -> RepoResult<Vec<Building>>;
}

/// SQLite-backed building repository.
pub struct SqliteBuildingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBuildingRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("buildings", BUILDING_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl BuildingRepository for SqliteBuildingRepository<'_> {
    fn locate_buildings_in_box(&self, bbox: &BoundingBox) -> RepoResult<Vec<Located<BuildingId>>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, latitude, longitude
             FROM buildings
             WHERE latitude BETWEEN ?1 AND ?2
               AND longitude BETWEEN ?3 AND ?4
             ORDER BY id ASC;",
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

    fn load_buildings(&self, ids: &[BuildingId]) -> RepoResult<Vec<Building>> {
        query_in_chunks(
            self.conn,
            "SELECT id, address, latitude, longitude
             FROM buildings
             WHERE id IN ({keys})
             ORDER BY id ASC;",
            ids,
            parse_building_row,
        )
    }
}

pub(crate) fn parse_building_row(row: &Row<'_>) -> RepoResult<Building> {
    let building = Building {
        id: row.get("id")?,
        address: row.get("address")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
    };
    building.validate().map_err(|err| {
        RepoError::InvalidData(format!("building `{}`: {err}", building.id))
    })?;
    Ok(building)
}
