//! Geographic search use-case service.
//!
//! # Responsibility
//! - Run radius and rectangle searches returning organizations (matched by
//!   their building's location) and buildings (matched directly).
//!
//! # Invariants
//! - The two collections come from independent storage calls and are not
//!   reconciled against each other.
//! - Either call failing fails the whole search; there is no partial result.
//! - Empty collections are a valid success, never `NotFound`.

use crate::aggregate::AggregateAssembler;
use crate::model::building::Building;
use crate::model::organization::Organization;
use crate::repo::building_repo::BuildingRepository;
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::RepoResult;
use crate::service::error::{QueryError, QueryResult};
use crate::spatial::engine::SpatialQueryEngine;
use crate::spatial::geo::{BoundingBox, GeoPoint, RadiusQuery};
use log::{debug, error, warn};
use serde::Serialize;

/// Result of one geographic search: two independent views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoSearchResult {
    pub organizations: Vec<Organization>,
    pub buildings: Vec<Building>,
}

impl GeoSearchResult {
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty() && self.buildings.is_empty()
    }
}

/// Use-case service for radius and rectangle searches.
pub struct GeoSearchService<O: OrganizationRepository, B: BuildingRepository> {
    organizations: O,
    buildings: B,
}

impl<O: OrganizationRepository, B: BuildingRepository> GeoSearchService<O, B> {
    pub fn new(organizations: O, buildings: B) -> Self {
        Self {
            organizations,
            buildings,
        }
    }

    /// Searches within `radius_meters` of (`latitude`, `longitude`).
    ///
    /// Out-of-range coordinates or a non-positive radius yield an empty
    /// result.
    pub fn search_by_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> QueryResult<GeoSearchResult> {
        let query = match RadiusQuery::try_new(latitude, longitude, radius_meters) {
            Ok(query) => query,
            Err(err) => {
                warn!(
                    "event=geo_search module=service op=search_by_radius status=rejected error={}",
                    err
                );
                return Ok(GeoSearchResult::default());
            }
        };

        let engine = SpatialQueryEngine::new(&self.buildings, &self.organizations);
        let outcome = self.collect(
            || engine.organizations_within_radius(&query),
            || engine.buildings_within_radius(&query),
        );

        self.finish("search_by_radius", outcome, || {
            format!(
                "error searching by radius (lat={latitude}, lon={longitude}, radius={radius_meters} m)"
            )
        })
    }

    /// Searches inside the literal lat/lon box.
    ///
    /// Inverted bounds or out-of-range coordinates yield an empty result.
    pub fn search_by_rectangle(
        &self,
        min_latitude: f64,
        min_longitude: f64,
        max_latitude: f64,
        max_longitude: f64,
    ) -> QueryResult<GeoSearchResult> {
        let corners = GeoPoint::try_new(min_latitude, min_longitude)
            .and_then(|_| GeoPoint::try_new(max_latitude, max_longitude));
        if let Err(err) = corners {
            warn!(
                "event=geo_search module=service op=search_by_rectangle status=rejected error={}",
                err
            );
            return Ok(GeoSearchResult::default());
        }

        let bbox = BoundingBox::new(min_latitude, min_longitude, max_latitude, max_longitude);
        let engine = SpatialQueryEngine::new(&self.buildings, &self.organizations);
        let outcome = self.collect(
            || engine.organizations_within_rectangle(&bbox),
            || engine.buildings_within_rectangle(&bbox),
        );

        self.finish("search_by_rectangle", outcome, || {
            format!(
                "error searching by rectangle (min_lat={min_latitude}, min_lon={min_longitude}, max_lat={max_latitude}, max_lon={max_longitude})"
            )
        })
    }

    fn collect<OI, BI>(
        &self,
        organization_ids: impl FnOnce() -> RepoResult<OI>,
        building_ids: impl FnOnce() -> RepoResult<BI>,
    ) -> RepoResult<GeoSearchResult>
    where
        OI: IntoIterator<Item = String>,
        BI: IntoIterator<Item = String>,
    {
        let organizations = AggregateAssembler::new(&self.organizations, &self.buildings)
            .assemble(organization_ids()?)?;
        let building_ids = building_ids()?.into_iter().collect::<Vec<_>>();
        let buildings = self.buildings.load_buildings(&building_ids)?;
        Ok(GeoSearchResult {
            organizations,
            buildings,
        })
    }

    fn finish(
        &self,
        operation: &'static str,
        outcome: RepoResult<GeoSearchResult>,
        failure: impl FnOnce() -> String,
    ) -> QueryResult<GeoSearchResult> {
        match outcome {
            Ok(result) => {
                debug!(
                    "event=geo_search module=service op={} status=ok organizations={} buildings={}",
                    operation,
                    result.organizations.len(),
                    result.buildings.len()
                );
                Ok(result)
            }
            Err(err) => {
                let message = failure();
                error!(
                    "event=geo_search module=service op={} status=error detail={} error={}",
                    operation, message, err
                );
                Err(QueryError::execution(operation, message, err))
            }
        }
    }
}
