//! Directory entity model.
//!
//! # Responsibility
//! - Define the read models for buildings, activities, organizations and
//!   their phones.
//! - Keep model invariants (coordinate ranges) checkable without storage.
//!
//! # Invariants
//! - Every organization references exactly one building.
//! - Activity parent links form a tree; readers still bound every traversal.
//! - Aggregates are assembled fresh per query and never shared mutably.

pub mod activity;
pub mod building;
pub mod organization;
