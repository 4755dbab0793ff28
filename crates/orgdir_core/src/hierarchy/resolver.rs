//! Bounded breadth-first closure over the activity tree.

use crate::db::casefold;
use crate::model::activity::{Activity, ActivityId};
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::RepoResult;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Levels walked above and below the seed activity.
pub const MAX_HIERARCHY_DEPTH: usize = 2;

/// Activity ids related to a seed name, with the level each was reached at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityClosure {
    seeds: BTreeSet<ActivityId>,
    ancestors: BTreeMap<ActivityId, usize>,
    descendants: BTreeMap<ActivityId, usize>,
}

impl ActivityClosure {
    /// Activities matched by name (level 0).
    pub fn seeds(&self) -> &BTreeSet<ActivityId> {
        &self.seeds
    }

    /// Ancestor id -> levels above the seed.
    pub fn ancestors(&self) -> &BTreeMap<ActivityId, usize> {
        &self.ancestors
    }

    /// Descendant id -> levels below the seed.
    pub fn descendants(&self) -> &BTreeMap<ActivityId, usize> {
        &self.descendants
    }

    /// Union of seeds, ancestors and descendants.
    pub fn ids(&self) -> BTreeSet<ActivityId> {
        self.seeds
            .iter()
            .chain(self.ancestors.keys())
            .chain(self.descendants.keys())
            .copied()
            .collect()
    }

    pub fn contains(&self, id: ActivityId) -> bool {
        self.seeds.contains(&id)
            || self.ancestors.contains_key(&id)
            || self.descendants.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

/// Resolves activity closures through an [`ActivityRepository`].
pub struct HierarchyResolver<'r, A: ActivityRepository> {
    activities: &'r A,
}

impl<'r, A: ActivityRepository> HierarchyResolver<'r, A> {
    pub fn new(activities: &'r A) -> Self {
        Self { activities }
    }

    /// Resolves the closure for `activity_name`.
    ///
    /// Name matching is case-insensitive and exact after trimming. A blank
    /// or unknown name yields an empty closure.
    pub fn resolve(&self, activity_name: &str) -> RepoResult<ActivityClosure> {
        let folded = casefold(activity_name.trim());
        if folded.is_empty() {
            return Ok(ActivityClosure::default());
        }

        let seeds = self.activities.find_by_name(&folded)?;
        if seeds.is_empty() {
            return Ok(ActivityClosure::default());
        }

        let seed_ids = seeds.iter().map(|seed| seed.id).collect::<BTreeSet<_>>();
        let descendants = self.walk_descendants(&seed_ids)?;
        let ancestors = self.walk_ancestors(&seeds, &seed_ids)?;

        debug!(
            "event=activity_closure module=hierarchy status=ok seeds={} ancestors={} descendants={}",
            seed_ids.len(),
            ancestors.len(),
            descendants.len()
        );

        Ok(ActivityClosure {
            seeds: seed_ids,
            ancestors,
            descendants,
        })
    }

    fn walk_descendants(
        &self,
        seed_ids: &BTreeSet<ActivityId>,
    ) -> RepoResult<BTreeMap<ActivityId, usize>> {
        let mut visited = seed_ids.clone();
        let mut found = BTreeMap::new();
        let mut frontier = seed_ids.iter().copied().collect::<Vec<_>>();

        for depth in 1..=MAX_HIERARCHY_DEPTH {
            if frontier.is_empty() {
                break;
            }
            let children = self.activities.list_children(&frontier)?;
            frontier = Vec::new();
            for child in children {
                if visited.insert(child.id) {
                    found.insert(child.id, depth);
                    frontier.push(child.id);
                }
            }
        }

        Ok(found)
    }

    fn walk_ancestors(
        &self,
        seeds: &[Activity],
        seed_ids: &BTreeSet<ActivityId>,
    ) -> RepoResult<BTreeMap<ActivityId, usize>> {
        let mut visited = seed_ids.clone();
        let mut found = BTreeMap::new();
        let mut pending = parent_ids(seeds, &visited);

        for depth in 1..=MAX_HIERARCHY_DEPTH {
            if pending.is_empty() {
                break;
            }
            // Dangling parent ids are dropped: only rows that exist join the closure.
            let parents = self.activities.load_activities(&pending)?;
            for parent in &parents {
                if visited.insert(parent.id) {
                    found.insert(parent.id, depth);
                }
            }
            pending = parent_ids(&parents, &visited);
        }

        Ok(found)
    }
}

fn parent_ids(nodes: &[Activity], visited: &BTreeSet<ActivityId>) -> Vec<ActivityId> {
    nodes
        .iter()
        .filter_map(|node| node.parent_id)
        .filter(|parent_id| !visited.contains(parent_id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
