//! Geospatial proximity and containment search.
//!
//! # Responsibility
//! - Provide geodesic distance and bounding-box math (`geo`).
//! - Resolve radius/rectangle predicates into identifier sets by combining
//!   a coarse storage scan with an exact in-memory predicate (`engine`).
//!
//! # Invariants
//! - Radius membership is `distance <= radius` (boundary included).
//! - Rectangle membership is a literal lat/lon comparison with no
//!   antimeridian wraparound.
//! - Inverted or non-finite inputs yield an empty set, never an error.

pub mod engine;
pub mod geo;
