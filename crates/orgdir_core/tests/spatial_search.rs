use orgdir_core::db::open_db_in_memory;
use orgdir_core::spatial::engine::SpatialQueryEngine;
use orgdir_core::spatial::geo::{BoundingBox, RadiusQuery};
use orgdir_core::{haversine_distance, SqliteBuildingRepository, SqliteOrganizationRepository};
use rusqlite::Connection;
use std::collections::BTreeSet;

mod common;

fn ids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn seed_city(conn: &Connection) {
    common::insert_building(conn, "b-center", "Red Square 1", 55.7558, 37.6173);
    common::insert_building(conn, "b-near", "Tverskaya 7", 55.7600, 37.6100);
    common::insert_building(conn, "b-far", "Sparrow Hills", 55.7100, 37.5400);
    common::insert_organization(conn, "org-shop", "Retail Shop", "b-center");
    common::insert_organization(conn, "org-cafe", "Corner Cafe", "b-near");
    common::insert_organization(conn, "org-park", "Park Kiosk", "b-far");
}

#[test]
fn radius_finds_buildings_and_organizations_near_center() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let buildings = SqliteBuildingRepository::try_new(&conn).unwrap();
    let organizations = SqliteOrganizationRepository::try_new(&conn).unwrap();
    let engine = SpatialQueryEngine::new(&buildings, &organizations);

    let query = RadiusQuery::try_new(55.7558, 37.6173, 1000.0).unwrap();
    assert_eq!(
        engine.buildings_within_radius(&query).unwrap(),
        ids(&["b-center", "b-near"])
    );
    assert_eq!(
        engine.organizations_within_radius(&query).unwrap(),
        ids(&["org-cafe", "org-shop"])
    );

    let remote = RadiusQuery::try_new(0.0, 0.0, 1000.0).unwrap();
    assert!(engine.buildings_within_radius(&remote).unwrap().is_empty());
    assert!(engine.organizations_within_radius(&remote).unwrap().is_empty());
}

#[test]
fn radius_boundary_is_inclusive() {
    let conn = open_db_in_memory().unwrap();
    common::insert_building(&conn, "b-edge", "Equator Rd", 0.0, 0.01);
    let buildings = SqliteBuildingRepository::try_new(&conn).unwrap();
    let organizations = SqliteOrganizationRepository::try_new(&conn).unwrap();
    let engine = SpatialQueryEngine::new(&buildings, &organizations);

    let exact = haversine_distance(0.0, 0.0, 0.0, 0.01);
    let on_edge = RadiusQuery::try_new(0.0, 0.0, exact).unwrap();
    assert_eq!(engine.buildings_within_radius(&on_edge).unwrap(), ids(&["b-edge"]));

    let just_short = RadiusQuery::try_new(0.0, 0.0, exact - 0.5).unwrap();
    assert!(engine.buildings_within_radius(&just_short).unwrap().is_empty());
}

#[test]
fn radius_across_antimeridian_finds_both_sides() {
    let conn = open_db_in_memory().unwrap();
    common::insert_building(&conn, "b-east", "Date Line East", 0.0, 179.999);
    common::insert_building(&conn, "b-west", "Date Line West", 0.0, -179.999);
    let buildings = SqliteBuildingRepository::try_new(&conn).unwrap();
    let organizations = SqliteOrganizationRepository::try_new(&conn).unwrap();
    let engine = SpatialQueryEngine::new(&buildings, &organizations);

    let query = RadiusQuery::try_new(0.0, 180.0, 500.0).unwrap();
    assert_eq!(
        engine.buildings_within_radius(&query).unwrap(),
        ids(&["b-east", "b-west"])
    );
}

#[test]
fn rectangle_returns_every_point_inside_the_box() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let buildings = SqliteBuildingRepository::try_new(&conn).unwrap();
    let organizations = SqliteOrganizationRepository::try_new(&conn).unwrap();
    let engine = SpatialQueryEngine::new(&buildings, &organizations);

    let bbox = BoundingBox::new(55.75, 37.60, 55.77, 37.62);
    assert_eq!(
        engine.buildings_within_rectangle(&bbox).unwrap(),
        ids(&["b-center", "b-near"])
    );
    assert_eq!(
        engine.organizations_within_rectangle(&bbox).unwrap(),
        ids(&["org-cafe", "org-shop"])
    );

    // Corners are inclusive.
    let tight = BoundingBox::new(55.7558, 37.6173, 55.7558, 37.6173);
    assert_eq!(engine.buildings_within_rectangle(&tight).unwrap(), ids(&["b-center"]));
}

#[test]
fn inverted_rectangle_is_empty_without_wraparound() {
    let conn = open_db_in_memory().unwrap();
    seed_city(&conn);
    let buildings = SqliteBuildingRepository::try_new(&conn).unwrap();
    let organizations = SqliteOrganizationRepository::try_new(&conn).unwrap();
    let engine = SpatialQueryEngine::new(&buildings, &organizations);

    let inverted_lat = BoundingBox::new(56.0, 37.0, 55.0, 38.0);
    assert!(engine.buildings_within_rectangle(&inverted_lat).unwrap().is_empty());

    let inverted_lon = BoundingBox::new(55.0, 38.0, 56.0, 37.0);
    assert!(engine.buildings_within_rectangle(&inverted_lon).unwrap().is_empty());
    assert!(engine
        .organizations_within_rectangle(&inverted_lon)
        .unwrap()
        .is_empty());
}
