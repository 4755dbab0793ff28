//! Organization aggregate assembly.
//!
//! # Responsibility
//! - Turn candidate organization ids into fully hydrated aggregates.
//!
//! # Invariants
//! - Exactly one aggregate per distinct candidate id, in first-seen order.
//! - Assembly is all-or-nothing: any storage failure discards the partial
//!   result.

mod assembler;

pub use assembler::AggregateAssembler;
