//! Organization lookup use-case service.
//!
//! # Responsibility
//! - Provide lookups by id, title fragment, building, exact activity and
//!   activity tree.
//! - Apply the empty-result policy: zero aggregates is `NotFound`.
//!
//! # Invariants
//! - Text terms are trimmed and case-folded before reaching storage.
//! - Blank terms skip storage entirely and end as `NotFound`.
//! - Storage failures are logged with the operation input and re-raised as
//!   `QueryError::Execution`.

use crate::aggregate::AggregateAssembler;
use crate::db::casefold;
use crate::hierarchy::HierarchyResolver;
use crate::model::organization::{Organization, OrganizationId};
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::building_repo::BuildingRepository;
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::error::{QueryError, QueryResult};
use log::{debug, error, warn};

/// Use-case service for organization lookups.
pub struct OrganizationService<O, B, A>
where
    O: OrganizationRepository,
    B: BuildingRepository,
    A: ActivityRepository,
{
    organizations: O,
    buildings: B,
    activities: A,
}

impl<O, B, A> OrganizationService<O, B, A>
where
    O: OrganizationRepository,
    B: BuildingRepository,
    A: ActivityRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(organizations: O, buildings: B, activities: A) -> Self {
        Self {
            organizations,
            buildings,
            activities,
        }
    }

    /// Gets one organization by id.
    ///
    /// # Errors
    /// - `NotFound` when the id is blank or unknown.
    /// - `Execution` on storage failure.
    pub fn get_by_id(&self, org_id: &str) -> QueryResult<Organization> {
        let id = org_id.trim();
        let hydrated = if id.is_empty() {
            Ok(Vec::new())
        } else {
            self.assembler().assemble([id.to_string()])
        };

        let mut aggregates = hydrated.map_err(|err| {
            execution_error(
                "get_by_id",
                format!("error getting organization by id {org_id}"),
                err,
            )
        })?;
        match aggregates.pop() {
            Some(organization) => Ok(organization),
            None => Err(not_found(
                "get_by_id",
                format!("organization with id {org_id} not found"),
            )),
        }
    }

    /// Gets organizations whose title contains `fragment`, ignoring case.
    pub fn get_by_name(&self, fragment: &str) -> QueryResult<Vec<Organization>> {
        let folded = casefold(fragment.trim());
        let candidates = if folded.is_empty() {
            Ok(Vec::new())
        } else {
            self.organizations.ids_by_title_fragment(&folded)
        };

        self.hydrate_list(
            "get_by_name",
            candidates,
            || format!("error getting organizations by name {fragment}"),
            || format!("organizations with name containing {fragment} not found"),
        )
    }

    /// Lists organizations housed in `building_id`.
    pub fn list_by_building(&self, building_id: &str) -> QueryResult<Vec<Organization>> {
        let id = building_id.trim();
        let candidates = if id.is_empty() {
            Ok(Vec::new())
        } else {
            self.organizations.ids_by_building(id)
        };

        self.hydrate_list(
            "list_by_building",
            candidates,
            || format!("error listing organizations by building {building_id}"),
            || format!("organizations for building {building_id} not found"),
        )
    }

    /// Lists organizations tagged with exactly `activity_name`, ignoring case.
    pub fn list_by_activity_exact(&self, activity_name: &str) -> QueryResult<Vec<Organization>> {
        let folded = casefold(activity_name.trim());
        let candidates = if folded.is_empty() {
            Ok(Vec::new())
        } else {
            self.organizations.ids_by_activity_name(&folded)
        };

        self.hydrate_list(
            "list_by_activity_exact",
            candidates,
            || format!("error listing organizations by activity {activity_name}"),
            || format!("organizations for activity {activity_name} not found"),
        )
    }

    /// Lists organizations tagged with `activity_name` or any activity up to
    /// two levels above or below it.
    pub fn list_by_activity_tree(&self, activity_name: &str) -> QueryResult<Vec<Organization>> {
        let candidates = HierarchyResolver::new(&self.activities)
            .resolve(activity_name)
            .and_then(|closure| {
                if closure.is_empty() {
                    return Ok(Vec::new());
                }
                let activity_ids = closure.ids().into_iter().collect::<Vec<_>>();
                self.organizations.ids_by_activity_ids(&activity_ids)
            });

        self.hydrate_list(
            "list_by_activity_tree",
            candidates,
            || format!("error listing organizations by activity tree {activity_name}"),
            || format!("organizations for activity {activity_name} not found"),
        )
    }

    fn assembler(&self) -> AggregateAssembler<'_, O, B> {
        AggregateAssembler::new(&self.organizations, &self.buildings)
    }

    fn hydrate_list(
        &self,
        operation: &'static str,
        candidates: RepoResult<Vec<OrganizationId>>,
        failure: impl FnOnce() -> String,
        empty: impl FnOnce() -> String,
    ) -> QueryResult<Vec<Organization>> {
        let aggregates = candidates
            .and_then(|ids| self.assembler().assemble(ids))
            .map_err(|err| execution_error(operation, failure(), err))?;
        if aggregates.is_empty() {
            return Err(not_found(operation, empty()));
        }
        debug!(
            "event=org_query module=service op={} status=ok count={}",
            operation,
            aggregates.len()
        );
        Ok(aggregates)
    }
}

fn not_found(operation: &'static str, message: String) -> QueryError {
    warn!(
        "event=org_query module=service op={} status=not_found detail={}",
        operation, message
    );
    QueryError::NotFound(message)
}

fn execution_error(operation: &'static str, message: String, source: RepoError) -> QueryError {
    error!(
        "event=org_query module=service op={} status=error detail={} error={}",
        operation, message, source
    );
    QueryError::execution(operation, message, source)
}
