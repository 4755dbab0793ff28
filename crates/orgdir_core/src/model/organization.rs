//! Organization aggregate model.
//!
//! # Responsibility
//! - Define the fully hydrated organization aggregate returned by queries.
//! - Define the flat organization record used during assembly.
//!
//! # Invariants
//! - `building_id` is always set; `building` is `None` only when the owning
//!   row could not be read in the same snapshot.
//! - `activities` holds no duplicate ids.
//! - `phones` keeps creation order.
//! - Aggregates are always fully hydrated, so an empty `activities` or
//!   `phones` list means "none exist", never "not loaded".

use crate::model::activity::Activity;
use crate::model::building::{Building, BuildingId};
use serde::{Deserialize, Serialize};

/// Opaque organization identifier.
pub type OrganizationId = String;

/// Phone number exclusively owned by one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationPhone {
    pub id: String,
    pub phone_number: String,
}

/// Flat organization row before relations are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationRecord {
    pub id: OrganizationId,
    pub title: String,
    pub building_id: BuildingId,
}

/// Organization aggregate with its building, activities and phones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub title: String,
    pub building_id: BuildingId,
    pub building: Option<Building>,
    pub activities: Vec<Activity>,
    pub phones: Vec<OrganizationPhone>,
}

impl Organization {
    /// Starts an aggregate from a flat record with no relations attached.
    pub fn from_record(record: OrganizationRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            building_id: record.building_id,
            building: None,
            activities: Vec::new(),
            phones: Vec::new(),
        }
    }

    /// Returns phone numbers in creation order.
    pub fn phone_numbers(&self) -> Vec<&str> {
        self.phones
            .iter()
            .map(|phone| phone.phone_number.as_str())
            .collect()
    }
}
