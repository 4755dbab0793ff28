//! Activity hierarchy resolution.
//!
//! # Responsibility
//! - Resolve an activity name into the set of related activity ids: the
//!   seed itself, ancestors up to two levels, descendants down to two levels.
//!
//! # Invariants
//! - Traversal depth is capped at [`MAX_HIERARCHY_DEPTH`] in both directions
//!   and terminates on cyclic parent links.
//! - The closure never contains duplicates.

mod resolver;

pub use resolver::{ActivityClosure, HierarchyResolver, MAX_HIERARCHY_DEPTH};
