//! Radius and rectangle resolution over repository candidate scans.
//!
//! Storage answers a coarse lat/lon box scan; the exact predicate is
//! applied here so every backend yields the same membership semantics.

use crate::model::building::BuildingId;
use crate::model::organization::OrganizationId;
use crate::repo::building_repo::BuildingRepository;
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::RepoResult;
use crate::spatial::geo::{BoundingBox, GeoPoint, RadiusQuery};
use log::debug;
use std::collections::BTreeSet;

/// Identifier paired with the coordinates it is located at.
///
/// For organizations these are the owning building's coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<Id> {
    pub id: Id,
    pub latitude: f64,
    pub longitude: f64,
}

impl<Id> Located<Id> {
    pub fn new(id: Id, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
        }
    }

    fn point(&self) -> Option<GeoPoint> {
        GeoPoint::try_new(self.latitude, self.longitude).ok()
    }
}

/// Spatial query engine bound to building and organization repositories.
pub struct SpatialQueryEngine<'r, B: BuildingRepository, O: OrganizationRepository> {
    buildings: &'r B,
    organizations: &'r O,
}

impl<'r, B: BuildingRepository, O: OrganizationRepository> SpatialQueryEngine<'r, B, O> {
    pub fn new(buildings: &'r B, organizations: &'r O) -> Self {
        Self {
            buildings,
            organizations,
        }
    }

    /// Buildings whose geodesic distance to the center is within the radius.
    pub fn buildings_within_radius(&self, query: &RadiusQuery) -> RepoResult<BTreeSet<BuildingId>> {
        let candidates = self
            .buildings
            .locate_buildings_in_box(&query.prefilter_box())?;
        Ok(filter_by_radius(candidates, query, "buildings"))
    }

    /// Buildings inside the literal lat/lon box.
    pub fn buildings_within_rectangle(
        &self,
        bbox: &BoundingBox,
    ) -> RepoResult<BTreeSet<BuildingId>> {
        if bbox.is_empty() {
            return Ok(BTreeSet::new());
        }
        let candidates = self.buildings.locate_buildings_in_box(bbox)?;
        Ok(filter_by_box(candidates, bbox))
    }

    /// Organizations whose building lies within the radius.
    pub fn organizations_within_radius(
        &self,
        query: &RadiusQuery,
    ) -> RepoResult<BTreeSet<OrganizationId>> {
        let candidates = self
            .organizations
            .locate_organizations_in_box(&query.prefilter_box())?;
        Ok(filter_by_radius(candidates, query, "organizations"))
    }

    /// Organizations whose building lies inside the literal lat/lon box.
    pub fn organizations_within_rectangle(
        &self,
        bbox: &BoundingBox,
    ) -> RepoResult<BTreeSet<OrganizationId>> {
        if bbox.is_empty() {
            return Ok(BTreeSet::new());
        }
        let candidates = self.organizations.locate_organizations_in_box(bbox)?;
        Ok(filter_by_box(candidates, bbox))
    }
}

fn filter_by_radius<Id: Ord>(
    candidates: Vec<Located<Id>>,
    query: &RadiusQuery,
    target: &'static str,
) -> BTreeSet<Id> {
    let scanned = candidates.len();
    let matched = candidates
        .into_iter()
        .filter(|candidate| {
            candidate
                .point()
                .is_some_and(|point| query.contains(&point))
        })
        .map(|candidate| candidate.id)
        .collect::<BTreeSet<_>>();
    let center = query.center();
    debug!(
        "event=radius_filter module=spatial target={} lat={} lon={} radius_m={} scanned={} matched={}",
        target,
        center.latitude(),
        center.longitude(),
        query.radius_meters(),
        scanned,
        matched.len()
    );
    matched
}

fn filter_by_box<Id: Ord>(candidates: Vec<Located<Id>>, bbox: &BoundingBox) -> BTreeSet<Id> {
    candidates
        .into_iter()
        .filter(|candidate| bbox.contains(candidate.latitude, candidate.longitude))
        .map(|candidate| candidate.id)
        .collect()
}
