//! Batched hydration of organization aggregates.

use crate::model::activity::Activity;
use crate::model::building::{Building, BuildingId};
use crate::model::organization::{Organization, OrganizationId, OrganizationPhone};
use crate::repo::building_repo::BuildingRepository;
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::RepoResult;
use std::collections::{HashMap, HashSet};

/// Hydrates organization aggregates from candidate ids.
pub struct AggregateAssembler<'r, O: OrganizationRepository, B: BuildingRepository> {
    organizations: &'r O,
    buildings: &'r B,
}

impl<'r, O: OrganizationRepository, B: BuildingRepository> AggregateAssembler<'r, O, B> {
    pub fn new(organizations: &'r O, buildings: &'r B) -> Self {
        Self {
            organizations,
            buildings,
        }
    }

    /// Builds one aggregate per distinct id in `candidates`.
    ///
    /// Candidates may repeat ids (one per qualifying join row). Ids with no
    /// stored organization are skipped.
    pub fn assemble<I>(&self, candidates: I) -> RepoResult<Vec<Organization>>
    where
        I: IntoIterator<Item = OrganizationId>,
    {
        let ids = distinct_in_order(candidates);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = self
            .organizations
            .load_records(&ids)?
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect::<HashMap<_, _>>();

        let building_ids = distinct_in_order(records.values().map(|r| r.building_id.clone()));
        let buildings = self
            .buildings
            .load_buildings(&building_ids)?
            .into_iter()
            .map(|building| (building.id.clone(), building))
            .collect::<HashMap<BuildingId, Building>>();

        let mut activities = group_activities(self.organizations.load_activity_links(&ids)?);
        let mut phones = group_phones(self.organizations.load_phones(&ids)?);

        let mut aggregates = Vec::with_capacity(records.len());
        for id in ids {
            let Some(record) = records.remove(&id) else {
                continue;
            };
            let mut organization = Organization::from_record(record);
            organization.building = buildings.get(&organization.building_id).cloned();
            organization.activities = activities.remove(&id).unwrap_or_default();
            organization.phones = phones.remove(&id).unwrap_or_default();
            aggregates.push(organization);
        }

        Ok(aggregates)
    }
}

fn distinct_in_order<T, I>(items: I) -> Vec<T>
where
    T: Clone + Eq + std::hash::Hash,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn group_activities(
    links: Vec<(OrganizationId, Activity)>,
) -> HashMap<OrganizationId, Vec<Activity>> {
    let mut grouped: HashMap<OrganizationId, Vec<Activity>> = HashMap::new();
    for (organization_id, activity) in links {
        let entry = grouped.entry(organization_id).or_default();
        if !entry.iter().any(|existing| existing.id == activity.id) {
            entry.push(activity);
        }
    }
    grouped
}

fn group_phones(
    rows: Vec<(OrganizationId, OrganizationPhone)>,
) -> HashMap<OrganizationId, Vec<OrganizationPhone>> {
    let mut grouped: HashMap<OrganizationId, Vec<OrganizationPhone>> = HashMap::new();
    for (organization_id, phone) in rows {
        grouped.entry(organization_id).or_default().push(phone);
    }
    grouped
}
