//! Great-circle distance and lat/lon box primitives.

use std::error::Error;
use std::f64::consts::FRAC_PI_2;
use std::fmt::{Display, Formatter};

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Slack added around radius prefilter boxes so floating point rounding
/// never drops a point sitting exactly on the radius.
const PREFILTER_PADDING_DEG: f64 = 1e-6;

/// Invalid geographic input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    InvalidRadius(f64),
}

impl Display for CoordinateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
            Self::InvalidRadius(value) => {
                write!(f, "radius {value} must be a positive number of meters")
            }
        }
    }
}

impl Error for CoordinateError {}

/// A validated WGS-84 point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting out-of-range or non-finite coordinates.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Haversine distance between two points in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Axis-aligned box in latitude/longitude degrees.
///
/// Bounds are compared literally: a box whose `min_lon > max_lon` is
/// inverted and contains nothing, it is not read as crossing the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns whether no point can satisfy this box.
    pub fn is_empty(&self) -> bool {
        let finite = [self.min_lat, self.min_lon, self.max_lat, self.max_lon]
            .iter()
            .all(|value| value.is_finite());
        !finite || self.min_lat > self.max_lat || self.min_lon > self.max_lon
    }

    /// Inclusive containment test.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}

/// Circle on the sphere: a center point and a radius in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    center: GeoPoint,
    radius_meters: f64,
}

impl RadiusQuery {
    /// Creates a radius query.
    ///
    /// # Errors
    /// - Center coordinates out of range.
    /// - Radius that is not a finite number greater than zero.
    pub fn try_new(
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Self, CoordinateError> {
        let center = GeoPoint::try_new(latitude, longitude)?;
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(CoordinateError::InvalidRadius(radius_meters));
        }
        Ok(Self {
            center,
            radius_meters,
        })
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Exact membership test, boundary included.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.center.distance_to(point) <= self.radius_meters
    }

    /// Smallest lat/lon box guaranteed to hold every point of the circle.
    ///
    /// Near the poles, or when the circle crosses the antimeridian, the
    /// longitude range widens to the whole globe.
    pub fn prefilter_box(&self) -> BoundingBox {
        let angular = self.radius_meters / EARTH_RADIUS_METERS;
        let lat = self.center.latitude;
        let lon = self.center.longitude;
        let delta_lat = angular.to_degrees() + PREFILTER_PADDING_DEG;

        let min_lat = lat - delta_lat;
        let max_lat = lat + delta_lat;
        if min_lat <= -90.0 || max_lat >= 90.0 || angular >= FRAC_PI_2 {
            return BoundingBox::new(min_lat.max(-90.0), -180.0, max_lat.min(90.0), 180.0);
        }

        let ratio = angular.sin() / lat.to_radians().cos();
        if ratio >= 1.0 {
            return BoundingBox::new(min_lat, -180.0, max_lat, 180.0);
        }
        let delta_lon = ratio.asin().to_degrees() + PREFILTER_PADDING_DEG;
        let min_lon = lon - delta_lon;
        let max_lon = lon + delta_lon;
        if min_lon < -180.0 || max_lon > 180.0 {
            return BoundingBox::new(min_lat, -180.0, max_lat, 180.0);
        }

        BoundingBox::new(min_lat, min_lon, max_lat, max_lon)
    }
}
