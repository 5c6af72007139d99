//! # Registry — Table-of-Tables with Atomic Write Discipline
//!
//! The `Registry` owns one [`Table`] per entity kind plus the
//! tenant–offering–location association rows and the cached ancestor view.
//! It is the only place where hierarchy validation and the parent-pointer
//! write meet: both happen inside a single `write_with` critical section on
//! the location table, the in-memory equivalent of validate-and-commit under
//! one serializable transaction.
//!
//! Writes are all-or-nothing: every precondition (existence, version,
//! hierarchy) is checked before the first field is touched, so an aborted
//! write leaves no partial audit stamp or parent mutation behind.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use locus_core::{
    DashboardId, DashboardOptionId, GeoPoint, LocationId, LocationTypeId, LogEntryId, OfferingId,
    TenantId, Timestamp, UserId,
};

use crate::ancestry::AncestorView;
use crate::hierarchy::{validate_reparent, HierarchyError};
use crate::records::{
    DashboardOptionRecord, DashboardRecord, LocationRecord, LogEntryRecord, StoredRecord,
    TenantOfferingLocation, TenantRecord,
};
use crate::scope::DeletionScope;
use crate::table::Table;

/// Errors raised by registry write operations. All of these short-circuit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The addressed row does not exist, or is deleted and therefore not
    /// addressable by a default-scope write.
    #[error("{kind} {id} not found")]
    NotFound {
        /// The entity kind ("location", "tenant", ...).
        kind: &'static str,
        /// The rendered identifier.
        id: String,
    },

    /// The caller's version token no longer matches the stored row. The
    /// caller must re-read and resubmit; the registry never retries.
    #[error("version conflict: expected {expected}, stored {actual}")]
    ConcurrencyConflict {
        /// The version the caller based its write on.
        expected: u64,
        /// The version actually stored.
        actual: u64,
    },

    /// Hierarchy validation rejected the write.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

impl RegistryError {
    fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Field changes for a location update. `None` leaves a field untouched; the
/// doubled `Option` on `parent` and `geometry` distinguishes "leave as is"
/// from "clear".
#[derive(Debug, Clone, Default)]
pub struct LocationChanges {
    pub name: Option<String>,
    pub type_id: Option<LocationTypeId>,
    pub parent: Option<Option<LocationId>>,
    pub geometry: Option<Option<GeoPoint>>,
}

impl LocationChanges {
    /// Whether this change set touches parent linkage.
    pub fn touches_hierarchy(&self) -> bool {
        self.parent.is_some()
    }
}

/// The entity store: one table per kind, association rows, and the cached
/// ancestor view. Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    locations: Table<LocationId, LocationRecord>,
    tenants: Table<TenantId, TenantRecord>,
    dashboards: Table<DashboardId, DashboardRecord>,
    dashboard_options: Table<DashboardOptionId, DashboardOptionRecord>,
    log_entries: Table<LogEntryId, LogEntryRecord>,
    associations: Arc<RwLock<HashSet<TenantOfferingLocation>>>,
    /// Lazily rebuilt, invalidated by every write that touches parent
    /// linkage or deletion state.
    ancestors: Arc<RwLock<Option<Arc<AncestorView>>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate_ancestors(&self) {
        *self.ancestors.write() = None;
    }

    // ─── Tenants ─────────────────────────────────────────────────────

    /// Insert a tenant row.
    pub fn insert_tenant(&self, record: TenantRecord) {
        self.tenants.insert(record.id, record);
    }

    /// Fetch a tenant visible in the given scope.
    pub fn get_tenant(&self, id: TenantId, scope: DeletionScope) -> Option<TenantRecord> {
        self.tenants.get(&id).filter(|t| scope.admits_record(t))
    }

    /// List tenants visible in the given scope.
    pub fn list_tenants(&self, scope: DeletionScope) -> Vec<TenantRecord> {
        self.tenants
            .list()
            .into_iter()
            .filter(|t| scope.admits_record(t))
            .collect()
    }

    /// Add a user to a tenant's membership.
    pub fn add_member(
        &self,
        tenant: TenantId,
        user: UserId,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.mutate_tenant(tenant, actor, now, |t| {
            t.members.insert(user);
        })
    }

    /// Remove a user from a tenant's membership.
    pub fn remove_member(
        &self,
        tenant: TenantId,
        user: UserId,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.mutate_tenant(tenant, actor, now, |t| {
            t.members.remove(&user);
        })
    }

    /// Subscribe a tenant to a product offering.
    pub fn add_offering(
        &self,
        tenant: TenantId,
        offering: OfferingId,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.mutate_tenant(tenant, actor, now, |t| {
            t.offerings.insert(offering);
        })
    }

    fn mutate_tenant(
        &self,
        tenant: TenantId,
        actor: UserId,
        now: Timestamp,
        f: impl FnOnce(&mut TenantRecord),
    ) -> Result<(), RegistryError> {
        self.tenants.write_with(|map| {
            let record = map
                .get_mut(&tenant)
                .filter(|t| !t.is_deleted())
                .ok_or_else(|| RegistryError::not_found("tenant", tenant))?;
            f(record);
            record.audit_mut().touch(actor, now);
            record.bump_version();
            Ok(())
        })
    }

    /// Soft-delete a tenant. Its memberships become inert grants.
    pub fn delete_tenant(
        &self,
        id: TenantId,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        soft_delete(&self.tenants, id, "tenant", actor, now)
    }

    // ─── Locations ───────────────────────────────────────────────────

    /// Insert a location row, validating its parent link in the same
    /// critical section as the insert.
    ///
    /// A fresh id cannot be anyone's ancestor, so cycle detection reduces to
    /// resolving the parent and checking tenant ownership.
    pub fn insert_location(&self, record: LocationRecord) -> Result<(), RegistryError> {
        let result = self.locations.write_with(|map| {
            if let Some(parent_id) = record.parent_id {
                let parent = map
                    .get(&parent_id)
                    .ok_or(HierarchyError::BrokenParentChain { missing: parent_id })?;
                if parent.tenant_id != record.tenant_id {
                    return Err(HierarchyError::TenantMismatch {
                        proposed_parent: parent_id,
                        parent_tenant: parent.tenant_id,
                        candidate_tenant: record.tenant_id,
                    });
                }
            }
            map.insert(record.id, record);
            Ok(())
        });
        self.invalidate_ancestors();
        result.map_err(RegistryError::from)
    }

    /// Fetch a location visible in the given scope.
    pub fn get_location(&self, id: LocationId, scope: DeletionScope) -> Option<LocationRecord> {
        self.locations.get(&id).filter(|l| scope.admits_record(l))
    }

    /// List locations visible in the given scope.
    pub fn list_locations(&self, scope: DeletionScope) -> Vec<LocationRecord> {
        self.locations
            .list()
            .into_iter()
            .filter(|l| scope.admits_record(l))
            .collect()
    }

    /// Reassign a location's parent.
    ///
    /// Validation and the pointer write share one write lock; two
    /// interleaved reparents observe each other's committed state, never an
    /// intermediate one.
    pub fn reparent(
        &self,
        candidate: LocationId,
        proposed_parent: Option<LocationId>,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        let result = self.locations.write_with(|map| {
            validate_reparent(map, candidate, proposed_parent)?;
            // Validation passed; the candidate is known to exist.
            if let Some(record) = map.get_mut(&candidate) {
                record.parent_id = proposed_parent;
                record.audit_mut().touch(actor, now);
                record.bump_version();
            }
            Ok::<(), HierarchyError>(())
        });
        self.invalidate_ancestors();
        match result {
            Ok(()) => {
                tracing::debug!(%candidate, parent = ?proposed_parent, "location reparented");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a validated change set to an active location.
    ///
    /// Preconditions — existence, version token, hierarchy if the change
    /// touches parent linkage — are all checked before any field is written.
    pub fn update_location(
        &self,
        id: LocationId,
        expected_version: u64,
        changes: LocationChanges,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        let touches_hierarchy = changes.touches_hierarchy();
        let result = self.locations.write_with(|map| {
            let current = map
                .get(&id)
                .filter(|l| !l.is_deleted())
                .ok_or_else(|| RegistryError::not_found("location", id))?;
            if current.version != expected_version {
                return Err(RegistryError::ConcurrencyConflict {
                    expected: expected_version,
                    actual: current.version,
                });
            }
            if let Some(new_parent) = changes.parent {
                validate_reparent(map, id, new_parent)?;
            }

            // All preconditions hold; commit.
            if let Some(record) = map.get_mut(&id) {
                if let Some(name) = changes.name {
                    record.name = name;
                }
                if let Some(type_id) = changes.type_id {
                    record.type_id = type_id;
                }
                if let Some(parent) = changes.parent {
                    record.parent_id = parent;
                }
                if let Some(geometry) = changes.geometry {
                    record.geometry = geometry;
                }
                record.audit_mut().touch(actor, now);
                record.bump_version();
            }
            Ok(())
        });
        if touches_hierarchy {
            self.invalidate_ancestors();
        }
        result
    }

    /// Soft-delete a location. Children keep their parent pointer — dangling
    /// but inert until they too are filtered or moved.
    pub fn delete_location(
        &self,
        id: LocationId,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        let result = soft_delete(&self.locations, id, "location", actor, now);
        self.invalidate_ancestors();
        result
    }

    // ─── Dashboards ──────────────────────────────────────────────────

    /// Insert a dashboard row; its owning tenant must exist.
    pub fn insert_dashboard(&self, record: DashboardRecord) -> Result<(), RegistryError> {
        if self.get_tenant(record.tenant_id, DeletionScope::ActiveOnly).is_none() {
            return Err(RegistryError::not_found("tenant", record.tenant_id));
        }
        self.dashboards.insert(record.id, record);
        Ok(())
    }

    /// Fetch a dashboard visible in the given scope.
    pub fn get_dashboard(&self, id: DashboardId, scope: DeletionScope) -> Option<DashboardRecord> {
        self.dashboards.get(&id).filter(|d| scope.admits_record(d))
    }

    /// List dashboards visible in the given scope.
    pub fn list_dashboards(&self, scope: DeletionScope) -> Vec<DashboardRecord> {
        self.dashboards
            .list()
            .into_iter()
            .filter(|d| scope.admits_record(d))
            .collect()
    }

    /// Soft-delete a dashboard.
    pub fn delete_dashboard(
        &self,
        id: DashboardId,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        soft_delete(&self.dashboards, id, "dashboard", actor, now)
    }

    /// Insert a dashboard option; its owning dashboard must exist.
    pub fn insert_dashboard_option(
        &self,
        record: DashboardOptionRecord,
    ) -> Result<(), RegistryError> {
        if self
            .get_dashboard(record.dashboard_id, DeletionScope::ActiveOnly)
            .is_none()
        {
            return Err(RegistryError::not_found("dashboard", record.dashboard_id));
        }
        self.dashboard_options.insert(record.id, record);
        Ok(())
    }

    /// List dashboard options visible in the given scope.
    pub fn list_dashboard_options(&self, scope: DeletionScope) -> Vec<DashboardOptionRecord> {
        self.dashboard_options
            .list()
            .into_iter()
            .filter(|o| scope.admits_record(o))
            .collect()
    }

    /// Soft-delete a dashboard option.
    pub fn delete_dashboard_option(
        &self,
        id: DashboardOptionId,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        soft_delete(&self.dashboard_options, id, "dashboard option", actor, now)
    }

    // ─── Log entries ─────────────────────────────────────────────────

    /// Insert a log entry; its owning location must exist (deleted locations
    /// still accept late-arriving entries, which stay invisible by scope).
    pub fn insert_log_entry(&self, record: LogEntryRecord) -> Result<(), RegistryError> {
        if !self.locations.contains(&record.location_id) {
            return Err(RegistryError::not_found("location", record.location_id));
        }
        self.log_entries.insert(record.id, record);
        Ok(())
    }

    /// List log entries visible in the given scope.
    pub fn list_log_entries(&self, scope: DeletionScope) -> Vec<LogEntryRecord> {
        self.log_entries
            .list()
            .into_iter()
            .filter(|e| scope.admits_record(e))
            .collect()
    }

    /// Soft-delete a log entry.
    pub fn delete_log_entry(
        &self,
        id: LogEntryId,
        actor: UserId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        soft_delete(&self.log_entries, id, "log entry", actor, now)
    }

    // ─── Associations ────────────────────────────────────────────────

    /// Tie a location to a tenant through one of the tenant's offerings.
    ///
    /// The tenant must exist, subscribe to the offering, and the location
    /// must exist.
    pub fn associate(
        &self,
        tenant_id: TenantId,
        offering_id: OfferingId,
        location_id: LocationId,
    ) -> Result<(), RegistryError> {
        let tenant = self
            .get_tenant(tenant_id, DeletionScope::ActiveOnly)
            .ok_or_else(|| RegistryError::not_found("tenant", tenant_id))?;
        if !tenant.offerings.contains(&offering_id) {
            return Err(RegistryError::not_found("offering", offering_id));
        }
        if !self.locations.contains(&location_id) {
            return Err(RegistryError::not_found("location", location_id));
        }
        self.associations.write().insert(TenantOfferingLocation {
            tenant_id,
            offering_id,
            location_id,
        });
        Ok(())
    }

    /// Remove an association row, if present.
    pub fn dissociate(
        &self,
        tenant_id: TenantId,
        offering_id: OfferingId,
        location_id: LocationId,
    ) {
        self.associations.write().remove(&TenantOfferingLocation {
            tenant_id,
            offering_id,
            location_id,
        });
    }

    /// Snapshot of all association rows.
    pub fn associations(&self) -> Vec<TenantOfferingLocation> {
        self.associations.read().iter().copied().collect()
    }

    // ─── Ancestor view ───────────────────────────────────────────────

    /// The materialized ancestor view, rebuilding it if a write invalidated
    /// the cached copy.
    pub fn ancestor_view(&self) -> Arc<AncestorView> {
        if let Some(view) = self.ancestors.read().as_ref() {
            return Arc::clone(view);
        }
        let rebuilt = Arc::new(self.locations.read_with(AncestorView::build));
        *self.ancestors.write() = Some(Arc::clone(&rebuilt));
        rebuilt
    }
}

/// Flip a row to deleted under one write lock, refreshing provenance.
///
/// A row that is missing or already deleted is `NotFound`: the default scope
/// cannot see it, so there is nothing for the caller to delete.
fn soft_delete<K, R>(
    table: &Table<K, R>,
    id: K,
    kind: &'static str,
    actor: UserId,
    now: Timestamp,
) -> Result<(), RegistryError>
where
    K: Eq + std::hash::Hash + Clone + std::fmt::Display,
    R: StoredRecord + Clone,
{
    table.write_with(|map| {
        let record = map
            .get_mut(&id)
            .filter(|r| !r.is_deleted())
            .ok_or_else(|| RegistryError::not_found(kind, &id))?;
        record.mark_deleted();
        record.audit_mut().touch(actor, now);
        record.bump_version();
        tracing::debug!(kind, %id, "row soft-deleted");
        Ok(())
    })
}
