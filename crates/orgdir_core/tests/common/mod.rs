#![allow(dead_code)]

use orgdir_core::model::organization::OrganizationRecord;
use orgdir_core::spatial::engine::Located;
use orgdir_core::spatial::geo::BoundingBox;
use orgdir_core::{
    Activity, ActivityId, ActivityRepository, OrganizationId, OrganizationPhone,
    OrganizationRepository, RepoError, RepoResult,
};
use rusqlite::{params, Connection};

pub fn insert_building(conn: &Connection, id: &str, address: &str, latitude: f64, longitude: f64) {
    conn.execute(
        "INSERT INTO buildings (id, address, latitude, longitude) VALUES (?1, ?2, ?3, ?4);",
        params![id, address, latitude, longitude],
    )
    .unwrap();
}

pub fn insert_activity(conn: &Connection, id: i64, name: &str, parent_id: Option<i64>) {
    conn.execute(
        "INSERT INTO activities (id, name, parent_id) VALUES (?1, ?2, ?3);",
        params![id, name, parent_id],
    )
    .unwrap();
}

pub fn insert_organization(conn: &Connection, id: &str, title: &str, building_id: &str) {
    conn.execute(
        "INSERT INTO organizations (id, title, building_id) VALUES (?1, ?2, ?3);",
        params![id, title, building_id],
    )
    .unwrap();
}

pub fn link_activity(conn: &Connection, organization_id: &str, activity_id: i64) {
    conn.execute(
        "INSERT INTO organization_activities (organization_id, activity_id) VALUES (?1, ?2);",
        params![organization_id, activity_id],
    )
    .unwrap();
}

pub fn insert_phone(conn: &Connection, id: &str, organization_id: &str, number: &str, created_at: i64) {
    conn.execute(
        "INSERT INTO organization_phones (id, organization_id, phone_number, created_at)
         VALUES (?1, ?2, ?3, ?4);",
        params![id, organization_id, number, created_at],
    )
    .unwrap();
}

/// Food -> Grocery -> Supermarket -> Hypermarket, plus an unrelated Services root.
pub fn seed_activity_chain(conn: &Connection) {
    insert_activity(conn, 1, "Food", None);
    insert_activity(conn, 2, "Grocery", Some(1));
    insert_activity(conn, 3, "Supermarket", Some(2));
    insert_activity(conn, 4, "Hypermarket", Some(3));
    insert_activity(conn, 10, "Services", None);
}

fn unavailable<T>() -> RepoResult<T> {
    Err(RepoError::Unavailable("connection refused".to_string()))
}

/// Organization storage whose every call fails.
pub struct UnavailableOrganizations;

impl OrganizationRepository for UnavailableOrganizations {
    fn ids_by_title_fragment(&self, _folded_fragment: &str) -> RepoResult<Vec<OrganizationId>> {
        unavailable()
    }

    fn ids_by_building(&self, _building_id: &str) -> RepoResult<Vec<OrganizationId>> {
        unavailable()
    }

    fn ids_by_activity_name(&self, _folded_name: &str) -> RepoResult<Vec<OrganizationId>> {
        unavailable()
    }

    fn ids_by_activity_ids(&self, _activity_ids: &[ActivityId]) -> RepoResult<Vec<OrganizationId>> {
        unavailable()
    }

    fn locate_organizations_in_box(
        &self,
        _bbox: &BoundingBox,
    ) -> RepoResult<Vec<Located<OrganizationId>>> {
        unavailable()
    }

    fn load_records(&self, _ids: &[OrganizationId]) -> RepoResult<Vec<OrganizationRecord>> {
        unavailable()
    }

    fn load_activity_links(
        &self,
        _ids: &[OrganizationId],
    ) -> RepoResult<Vec<(OrganizationId, Activity)>> {
        unavailable()
    }

    fn load_phones(
        &self,
        _ids: &[OrganizationId],
    ) -> RepoResult<Vec<(OrganizationId, OrganizationPhone)>> {
        unavailable()
    }
}

/// Activity storage whose every call fails.
pub struct UnavailableActivities;

impl ActivityRepository for UnavailableActivities {
    fn find_by_name(&self, _folded_name: &str) -> RepoResult<Vec<Activity>> {
        unavailable()
    }

    fn list_children(&self, _parent_ids: &[ActivityId]) -> RepoResult<Vec<Activity>> {
        unavailable()
    }

    fn load_activities(&self, _ids: &[ActivityId]) -> RepoResult<Vec<Activity>> {
        unavailable()
    }
}
