//! # Visibility — Tenant-Scoped, De-Duplicated Reads
//!
//! Computes the subset of entities a user may see, based on tenant
//! membership. Every function composes conjunctively with the caller's
//! [`DeletionScope`]: a row must pass both the access filter and the
//! soft-delete filter to be returned.
//!
//! A user can reach the same entity through more than one membership path
//! (two tenants sharing an association to one location), so results are
//! de-duplicated by identity before being returned.
//!
//! Rules:
//! - A location or dashboard is visible iff the user is a member of its
//!   owning tenant.
//! - A dashboard option is visible iff its owning dashboard is.
//! - A log entry is visible iff its owning location is reachable through a
//!   tenant–offering–location association for a tenant the user belongs to.

use std::collections::HashSet;

use locus_core::{LocationId, UserId};
use locus_registry::{
    DashboardOptionRecord, DashboardRecord, DeletionScope, LocationRecord, LogEntryRecord,
    Registry,
};

use crate::membership::MembershipIndex;

/// Build the membership index from the registry's current tenant table.
///
/// Membership is always computed over active tenants: a deleted tenant's
/// grants are inert regardless of the read scope applied to the results.
fn membership(registry: &Registry) -> MembershipIndex {
    MembershipIndex::build(&registry.list_tenants(DeletionScope::ActiveOnly))
}

/// The locations the user may see: owning tenant membership, composed with
/// the deletion scope.
pub fn visible_locations(
    registry: &Registry,
    user: UserId,
    scope: DeletionScope,
) -> Vec<LocationRecord> {
    let index = membership(registry);
    let mut seen: HashSet<LocationId> = HashSet::new();
    registry
        .list_locations(scope)
        .into_iter()
        .filter(|l| index.is_member(user, l.tenant_id))
        .filter(|l| seen.insert(l.id))
        .collect()
}

/// The dashboards the user may see.
pub fn visible_dashboards(
    registry: &Registry,
    user: UserId,
    scope: DeletionScope,
) -> Vec<DashboardRecord> {
    let index = membership(registry);
    registry
        .list_dashboards(scope)
        .into_iter()
        .filter(|d| index.is_member(user, d.tenant_id))
        .collect()
}

/// The dashboard options the user may see: those whose owning dashboard is
/// itself visible under the same scope.
pub fn visible_dashboard_options(
    registry: &Registry,
    user: UserId,
    scope: DeletionScope,
) -> Vec<DashboardOptionRecord> {
    let visible: HashSet<_> = visible_dashboards(registry, user, scope)
        .into_iter()
        .map(|d| d.id)
        .collect();
    registry
        .list_dashboard_options(scope)
        .into_iter()
        .filter(|o| visible.contains(&o.dashboard_id))
        .collect()
}

/// The log entries the user may see: entries whose owning location is
/// reachable through an association row for one of the user's tenants.
///
/// The same location is frequently reachable through several memberships;
/// the reachable set collapses those paths so each entry is returned once.
pub fn visible_log_entries(
    registry: &Registry,
    user: UserId,
    scope: DeletionScope,
) -> Vec<LogEntryRecord> {
    let reachable = reachable_location_ids(registry, user, scope);
    registry
        .list_log_entries(scope)
        .into_iter()
        .filter(|e| reachable.contains(&e.location_id))
        .collect()
}

/// Location ids reachable for the user via tenant–offering–location
/// associations, de-duplicated across membership paths.
pub fn reachable_location_ids(
    registry: &Registry,
    user: UserId,
    scope: DeletionScope,
) -> HashSet<LocationId> {
    let index = membership(registry);
    let user_tenants = index.tenants_of(user);

    let mut reachable = HashSet::new();
    for association in registry.associations() {
        if !user_tenants.contains(&association.tenant_id) {
            continue;
        }
        if registry.get_location(association.location_id, scope).is_some() {
            reachable.insert(association.location_id);
        }
    }
    reachable
}
