use orgdir_core::db::open_db_in_memory;
use orgdir_core::spatial::engine::Located;
use orgdir_core::spatial::geo::BoundingBox;
use orgdir_core::{
    Building, BuildingId, BuildingRepository, GeoSearchService, QueryError, RepoError, RepoResult,
    SqliteBuildingRepository, SqliteOrganizationRepository,
};
use rusqlite::Connection;

mod common;

/// Building storage that answers lookups but fails every spatial scan.
struct UnavailableBuildings<'c> {
    inner: SqliteBuildingRepository<'c>,
}

impl BuildingRepository for UnavailableBuildings<'_> {
    fn locate_buildings_in_box(&self, _bbox: &BoundingBox) -> RepoResult<Vec<Located<BuildingId>>> {
        Err(RepoError::Unavailable("connection pool exhausted".to_string()))
    }

    fn load_buildings(&self, ids: &[BuildingId]) -> RepoResult<Vec<Building>> {
        self.inner.load_buildings(ids)
    }
}

fn seed_city(conn: &Connection) {
    common::insert_building(conn, "b-center", "Red Square 1", 55.7558, 37.6173);
    common::insert_building(conn, "b-empty", "Tverskaya 7", 55.7600, 37.6100);
    common::insert_building(conn, "b-far", "Nevsky 28", 59.9343, 30.3351);
    common::insert_organization(conn, "org-shop", "Retail Shop", "b-center");
    common::insert_organization(conn, "org-north", "Northern Books", "b-far");
    common::insert_phone(conn, "p-1", "org-shop", "2-222-222", 1);
}

#[test]
fn radius_search_returns_both_collections() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let service = GeoSearchService::new(
        SqliteOrganizationRepository::try_new(&conn).unwrap(),
        SqliteBuildingRepository::try_new(&conn).unwrap(),
    );

    let result = service.search_by_radius(55.7558, 37.6173, 1000.0).unwrap();
    assert_eq!(result.organizations.len(), 1);
    assert_eq!(result.organizations[0].title, "Retail Shop");
    assert_eq!(result.organizations[0].phone_numbers(), vec!["2-222-222"]);
    assert_eq!(
        result.buildings.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(),
        vec!["b-center", "b-empty"]
    );
}

#[test]
fn radius_search_far_from_data_is_empty_success() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let service = GeoSearchService::new(
        SqliteOrganizationRepository::try_new(&conn).unwrap(),
        SqliteBuildingRepository::try_new(&conn).unwrap(),
    );

    let result = service.search_by_radius(0.0, 0.0, 1000.0).unwrap();
    assert!(result.is_empty());
}

#[test]
fn invalid_geo_inputs_yield_empty_results() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let service = GeoSearchService::new(
        SqliteOrganizationRepository::try_new(&conn).unwrap(),
        SqliteBuildingRepository::try_new(&conn).unwrap(),
    );

    assert!(service.search_by_radius(95.0, 37.6, 1000.0).unwrap().is_empty());
    assert!(service.search_by_radius(55.7, 37.6, -5.0).unwrap().is_empty());
    assert!(service
        .search_by_rectangle(-91.0, 0.0, 10.0, 10.0)
        .unwrap()
        .is_empty());
    assert!(service
        .search_by_rectangle(60.0, 38.0, 55.0, 30.0)
        .unwrap()
        .is_empty());
}

#[test]
fn rectangle_search_covers_whole_region() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let service = GeoSearchService::new(
        SqliteOrganizationRepository::try_new(&conn).unwrap(),
        SqliteBuildingRepository::try_new(&conn).unwrap(),
    );

    let result = service.search_by_rectangle(55.0, 30.0, 60.0, 38.0).unwrap();
    assert_eq!(
        result.organizations.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
        vec!["org-north", "org-shop"]
    );
    assert_eq!(result.buildings.len(), 3);
}

#[test]
fn storage_failure_aborts_search_without_partial_result() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let service = GeoSearchService::new(
        SqliteOrganizationRepository::try_new(&conn).unwrap(),
        UnavailableBuildings {
            inner: SqliteBuildingRepository::try_new(&conn).unwrap(),
        },
    );

    let err = service.search_by_radius(55.7558, 37.6173, 1000.0).unwrap_err();
    assert!(err.is_execution());
    match err {
        QueryError::Execution {
            operation,
            message,
            source,
        } => {
            assert_eq!(operation, "search_by_radius");
            assert!(message.contains("lat=55.7558"));
            assert!(matches!(source, RepoError::Unavailable(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn result_serializes_with_two_named_collections() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let service = GeoSearchService::new(
        SqliteOrganizationRepository::try_new(&conn).unwrap(),
        SqliteBuildingRepository::try_new(&conn).unwrap(),
    );

    let result = service.search_by_radius(55.7558, 37.6173, 100.0).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["organizations"][0]["id"], "org-shop");
    assert_eq!(json["organizations"][0]["building"]["address"], "Red Square 1");
    assert_eq!(json["organizations"][0]["phones"][0]["phone_number"], "2-222-222");
    assert_eq!(json["buildings"][0]["latitude"], 55.7558);
}

#[test]
fn organization_side_failure_aborts_rectangle_search() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let service = GeoSearchService::new(
        common::UnavailableOrganizations,
        SqliteBuildingRepository::try_new(&conn).unwrap(),
    );

    let err = service.search_by_rectangle(55.0, 30.0, 60.0, 38.0).unwrap_err();
    match err {
        QueryError::Execution {
            operation,
            message,
            source,
        } => {
            assert_eq!(operation, "search_by_rectangle");
            assert!(message.contains("min_lat=55"));
            assert!(matches!(source, RepoError::Unavailable(_)));
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = service.search_by_radius(55.7558, 37.6173, 1000.0).unwrap_err();
    assert!(err.is_execution());
}
