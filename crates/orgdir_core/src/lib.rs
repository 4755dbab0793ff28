//! Core read model for the organization directory.
//! Owns storage access, geospatial search, activity hierarchy resolution
//! and the query services built on top of them.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod hierarchy;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod spatial;

pub use config::{ConfigError, DirectoryConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{Activity, ActivityId};
pub use model::building::{Building, BuildingId};
pub use model::organization::{Organization, OrganizationId, OrganizationPhone};
pub use repo::activity_repo::{ActivityRepository, SqliteActivityRepository};
pub use repo::building_repo::{BuildingRepository, SqliteBuildingRepository};
pub use repo::organization_repo::{OrganizationRepository, SqliteOrganizationRepository};
pub use repo::{RepoError, RepoResult};
pub use service::error::{QueryError, QueryResult};
pub use service::geo_search_service::{GeoSearchResult, GeoSearchService};
pub use service::organization_service::OrganizationService;
pub use spatial::geo::{haversine_distance, CoordinateError, GeoPoint};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
