use orgdir_core::db::open_db_in_memory;
use orgdir_core::hierarchy::{HierarchyResolver, MAX_HIERARCHY_DEPTH};
use orgdir_core::{
    OrganizationService, SqliteActivityRepository, SqliteBuildingRepository,
    SqliteOrganizationRepository,
};
use rusqlite::Connection;
use std::collections::BTreeSet;

mod common;

fn tree_service(
    conn: &Connection,
) -> OrganizationService<
    SqliteOrganizationRepository<'_>,
    SqliteBuildingRepository<'_>,
    SqliteActivityRepository<'_>,
> {
    OrganizationService::new(
        SqliteOrganizationRepository::try_new(conn).unwrap(),
        SqliteBuildingRepository::try_new(conn).unwrap(),
        SqliteActivityRepository::try_new(conn).unwrap(),
    )
}

fn seed_tagged_organizations(conn: &Connection) {
    common::seed_activity_chain(conn);
    common::insert_building(conn, "b-1", "1 Market St", 55.75, 37.61);
    common::insert_organization(conn, "org-food", "Food Court", "b-1");
    common::insert_organization(conn, "org-grocery", "Green Grocer", "b-1");
    common::insert_organization(conn, "org-super", "Super Saver", "b-1");
    common::insert_organization(conn, "org-hyper", "Hyper Hall", "b-1");
    common::insert_organization(conn, "org-repair", "Repair Desk", "b-1");
    common::link_activity(conn, "org-food", 1);
    common::link_activity(conn, "org-grocery", 2);
    common::link_activity(conn, "org-super", 3);
    common::link_activity(conn, "org-hyper", 4);
    common::link_activity(conn, "org-repair", 10);
}

fn titles(organizations: &[orgdir_core::Organization]) -> Vec<&str> {
    organizations.iter().map(|org| org.title.as_str()).collect()
}

#[test]
fn resolver_spans_parent_and_children_of_middle_node() {
    let conn = open_db_in_memory().unwrap();
    common::seed_activity_chain(&conn);
    let activities = SqliteActivityRepository::try_new(&conn).unwrap();

    let closure = HierarchyResolver::new(&activities).resolve("grocery").unwrap();
    assert_eq!(closure.ids(), BTreeSet::from([1, 2, 3, 4]));
    assert_eq!(closure.seeds(), &BTreeSet::from([2]));
    assert_eq!(closure.ancestors().get(&1), Some(&1));
    assert_eq!(closure.descendants().get(&3), Some(&1));
    assert_eq!(closure.descendants().get(&4), Some(&2));
    assert!(!closure.contains(10));
}

#[test]
fn resolver_stops_after_two_levels() {
    let conn = open_db_in_memory().unwrap();
    common::seed_activity_chain(&conn);
    let activities = SqliteActivityRepository::try_new(&conn).unwrap();
    let resolver = HierarchyResolver::new(&activities);

    let from_root = resolver.resolve("Food").unwrap();
    assert_eq!(from_root.ids(), BTreeSet::from([1, 2, 3]));
    assert!(from_root
        .descendants()
        .values()
        .all(|depth| *depth <= MAX_HIERARCHY_DEPTH));

    let from_leaf = resolver.resolve("Hypermarket").unwrap();
    assert_eq!(from_leaf.ids(), BTreeSet::from([2, 3, 4]));
}

#[test]
fn third_level_descendant_is_excluded() {
    let conn = open_db_in_memory().unwrap();
    common::seed_activity_chain(&conn);
    common::insert_activity(&conn, 5, "Megastore", Some(4));
    let activities = SqliteActivityRepository::try_new(&conn).unwrap();

    let closure = HierarchyResolver::new(&activities).resolve("Grocery").unwrap();
    assert!(closure.contains(4));
    assert!(!closure.contains(5));
}

#[test]
fn resolver_terminates_on_cyclic_parents() {
    let conn = open_db_in_memory().unwrap();
    common::seed_activity_chain(&conn);
    conn.execute("UPDATE activities SET parent_id = 4 WHERE id = 1;", [])
        .unwrap();
    let activities = SqliteActivityRepository::try_new(&conn).unwrap();

    let closure = HierarchyResolver::new(&activities).resolve("Food").unwrap();
    assert_eq!(closure.ids(), BTreeSet::from([1, 2, 3, 4]));
}

#[test]
fn tree_listing_includes_related_activities_once() {
    let conn = open_db_in_memory().unwrap();
    seed_tagged_organizations(&conn);
    common::link_activity(&conn, "org-super", 2);

    let found = tree_service(&conn).list_by_activity_tree("Grocery").unwrap();
    assert_eq!(
        titles(&found),
        vec!["Food Court", "Green Grocer", "Hyper Hall", "Super Saver"]
    );
}

#[test]
fn exact_listing_ignores_hierarchy() {
    let conn = open_db_in_memory().unwrap();
    seed_tagged_organizations(&conn);

    let found = tree_service(&conn).list_by_activity_exact("  GROCERY ").unwrap();
    assert_eq!(titles(&found), vec!["Green Grocer"]);
}

#[test]
fn unknown_or_blank_activity_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed_tagged_organizations(&conn);
    let service = tree_service(&conn);

    assert!(service.list_by_activity_tree("Bakery").unwrap_err().is_not_found());
    assert!(service.list_by_activity_tree("   ").unwrap_err().is_not_found());
    assert!(service.list_by_activity_exact("").unwrap_err().is_not_found());
}

#[test]
fn activity_without_organizations_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    common::seed_activity_chain(&conn);
    common::insert_activity(&conn, 20, "Orphan", None);

    let err = tree_service(&conn).list_by_activity_tree("Orphan").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Orphan"));
}
