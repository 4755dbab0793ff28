//! Activity classification node.

use serde::{Deserialize, Serialize};

/// Integer identifier of an activity node.
pub type ActivityId = i64;

/// One node of the activity classification tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    /// `None` for root activities.
    pub parent_id: Option<ActivityId>,
}

impl Activity {
    pub fn new(id: ActivityId, name: impl Into<String>, parent_id: Option<ActivityId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }
}
