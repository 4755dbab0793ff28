//! Directory query use-case services.
//!
//! # Responsibility
//! - Compose spatial search, hierarchy resolution and aggregate assembly
//!   into the public read operations.
//! - Translate storage failures into execution errors and empty results
//!   into not-found outcomes.
//!
//! # Invariants
//! - Services are stateless per call and never mutate storage.
//! - A `RepoError` never crosses this boundary untranslated.

pub mod error;
pub mod geo_search_service;
pub mod organization_service;
