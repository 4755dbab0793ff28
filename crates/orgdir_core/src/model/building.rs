//! Building domain model.
//!
//! # Invariants
//! - `-90 <= latitude <= 90`.
//! - `-180 <= longitude <= 180`.
//! - The point geometry is derived from latitude/longitude, never stored
//!   separately.

use crate::spatial::geo::{CoordinateError, GeoPoint};
use serde::{Deserialize, Serialize};

/// Opaque building identifier.
pub type BuildingId = String;

/// A physical building that hosts organizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    /// Postal address.
    pub address: String,
    /// WGS-84 degrees.
    pub latitude: f64,
    /// WGS-84 degrees.
    pub longitude: f64,
}

impl Building {
    pub fn new(
        id: impl Into<BuildingId>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            latitude,
            longitude,
        }
    }

    /// Checks the coordinate range invariants.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        GeoPoint::try_new(self.latitude, self.longitude).map(|_| ())
    }
}
