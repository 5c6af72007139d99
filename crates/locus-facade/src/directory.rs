//! # Directory — The Facade Contract
//!
//! The single entry point the external HTTP/OData layer calls into. Writes
//! validate exhaustively, stamp audit provenance, and commit through the
//! registry's atomic write paths; reads compose the tenant access filter
//! with the caller's deletion scope before applying caller-supplied query
//! options.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use locus_access::{
    visible_dashboard_options, visible_dashboards, visible_locations, visible_log_entries,
};
use locus_core::{
    DashboardId, DashboardOptionId, LocationId, LogEntryId, OfferingId, TenantId, Timestamp,
    UserId, ValidationErrors,
};
use locus_registry::{
    DashboardOptionRecord, DashboardRecord, DeletionScope, HierarchyError, LocationChanges,
    LocationRecord, LogEntryRecord, QueryOptions, Registry, RegistryError, TenantRecord,
};

use crate::dto::{
    DashboardDraft, DashboardOptionDraft, LocationDraft, LocationUpdate, LogEntryDraft,
    TenantDraft,
};
use crate::validation::{
    optional_text, require_present, require_text, validate_geometry, KEY_MAX_LEN, MESSAGE_MAX_LEN,
    NAME_MAX_LEN, NAME_MIN_LEN,
};

/// Errors surfaced through the facade.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FacadeError {
    /// One or more field failures, collected exhaustively.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Hierarchy validation rejected the write. Short-circuits.
    #[error(transparent)]
    Hierarchy(HierarchyError),

    /// Persistence-level failure: missing row or version conflict.
    /// Short-circuits; a conflict must be resubmitted with a fresh version.
    #[error(transparent)]
    Registry(RegistryError),
}

impl From<HierarchyError> for FacadeError {
    fn from(err: HierarchyError) -> Self {
        Self::Hierarchy(err)
    }
}

impl From<RegistryError> for FacadeError {
    fn from(err: RegistryError) -> Self {
        // Keep hierarchy errors addressable as hierarchy errors even when
        // they bubbled up through a registry write.
        match err {
            RegistryError::Hierarchy(inner) => Self::Hierarchy(inner),
            other => Self::Registry(other),
        }
    }
}

/// One row of a flattened tree listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeRow {
    pub location: LocationRecord,
    /// Depth below the root (root = 0), from the materialized ancestor view.
    pub depth: usize,
}

/// The facade service. Cloning shares the underlying registry.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    registry: Registry,
}

impl Directory {
    /// Create a directory over an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory over an existing registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ─── Tenants ─────────────────────────────────────────────────────

    /// Create a tenant.
    pub fn create_tenant(
        &self,
        draft: TenantDraft,
        actor: UserId,
    ) -> Result<TenantId, FacadeError> {
        let mut errors = ValidationErrors::new();
        let name = require_text(
            &mut errors,
            "name",
            draft.name.as_deref(),
            NAME_MIN_LEN,
            NAME_MAX_LEN,
        );
        errors.into_result(())?;
        let name = match name {
            Some(name) => name,
            None => unreachable!("validated fields missing without recorded errors"),
        };

        let id = TenantId::new();
        self.registry
            .insert_tenant(TenantRecord::new(id, name, actor, Timestamp::now()));
        tracing::info!(tenant = %id, %actor, "tenant created");
        Ok(id)
    }

    /// Add a user to a tenant.
    pub fn add_member(
        &self,
        tenant: TenantId,
        user: UserId,
        actor: UserId,
    ) -> Result<(), FacadeError> {
        self.registry
            .add_member(tenant, user, actor, Timestamp::now())?;
        Ok(())
    }

    /// Remove a user from a tenant.
    pub fn remove_member(
        &self,
        tenant: TenantId,
        user: UserId,
        actor: UserId,
    ) -> Result<(), FacadeError> {
        self.registry
            .remove_member(tenant, user, actor, Timestamp::now())?;
        Ok(())
    }

    /// Subscribe a tenant to a product offering.
    pub fn add_offering(
        &self,
        tenant: TenantId,
        offering: OfferingId,
        actor: UserId,
    ) -> Result<(), FacadeError> {
        self.registry
            .add_offering(tenant, offering, actor, Timestamp::now())?;
        Ok(())
    }

    /// Tie a location to a tenant through one of its offerings.
    pub fn associate_offering_location(
        &self,
        tenant: TenantId,
        offering: OfferingId,
        location: LocationId,
    ) -> Result<(), FacadeError> {
        self.registry.associate(tenant, offering, location)?;
        Ok(())
    }

    /// Soft-delete a tenant.
    pub fn delete_tenant(&self, id: TenantId, actor: UserId) -> Result<(), FacadeError> {
        self.registry.delete_tenant(id, actor, Timestamp::now())?;
        tracing::info!(tenant = %id, %actor, "tenant deleted");
        Ok(())
    }

    // ─── Locations ───────────────────────────────────────────────────

    /// Create a location.
    ///
    /// All field failures are collected before returning; parent linkage is
    /// then validated atomically with the insert.
    pub fn create_location(
        &self,
        draft: LocationDraft,
        actor: UserId,
    ) -> Result<LocationId, FacadeError> {
        let mut errors = ValidationErrors::new();
        let name = require_text(
            &mut errors,
            "name",
            draft.name.as_deref(),
            NAME_MIN_LEN,
            NAME_MAX_LEN,
        );
        let tenant_id = require_present(&mut errors, "tenant_id", draft.tenant_id);
        let type_id = require_present(&mut errors, "type_id", draft.type_id);
        let geometry = validate_geometry(&mut errors, "geometry", draft.geometry);
        errors.into_result(())?;

        // All three are Some once validation passed.
        let (name, tenant_id, type_id) = match (name, tenant_id, type_id) {
            (Some(name), Some(tenant_id), Some(type_id)) => (name, tenant_id, type_id),
            _ => unreachable!("validated fields missing without recorded errors"),
        };

        if self
            .registry
            .get_tenant(tenant_id, DeletionScope::ActiveOnly)
            .is_none()
        {
            return Err(RegistryError::NotFound {
                kind: "tenant",
                id: tenant_id.to_string(),
            }
            .into());
        }

        let id = LocationId::new();
        self.registry.insert_location(LocationRecord::new(
            id,
            tenant_id,
            name,
            type_id,
            draft.parent_id,
            geometry,
            actor,
            Timestamp::now(),
        ))?;
        tracing::info!(location = %id, tenant = %tenant_id, %actor, "location created");
        Ok(id)
    }

    /// Update a location under optimistic concurrency.
    pub fn update_location(
        &self,
        id: LocationId,
        update: LocationUpdate,
        actor: UserId,
    ) -> Result<(), FacadeError> {
        let mut errors = ValidationErrors::new();
        let name = optional_text(
            &mut errors,
            "name",
            update.name.as_deref(),
            NAME_MIN_LEN,
            NAME_MAX_LEN,
        );
        let geometry = match update.geometry {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => validate_geometry(&mut errors, "geometry", Some(raw)).map(Some),
        };
        errors.into_result(())?;

        self.registry.update_location(
            id,
            update.expected_version,
            LocationChanges {
                name,
                type_id: update.type_id,
                parent: update.parent,
                geometry,
            },
            actor,
            Timestamp::now(),
        )?;
        tracing::info!(location = %id, %actor, "location updated");
        Ok(())
    }

    /// Reassign a location's parent (`None` makes it a root).
    pub fn reparent(
        &self,
        id: LocationId,
        parent: Option<LocationId>,
        actor: UserId,
    ) -> Result<(), FacadeError> {
        self.registry
            .reparent(id, parent, actor, Timestamp::now())?;
        Ok(())
    }

    /// Soft-delete a location.
    pub fn delete_location(&self, id: LocationId, actor: UserId) -> Result<(), FacadeError> {
        self.registry
            .delete_location(id, actor, Timestamp::now())?;
        tracing::info!(location = %id, %actor, "location deleted");
        Ok(())
    }

    /// List the locations visible to the user, filtered, sorted, and paged.
    ///
    /// Tenant and soft-delete filters apply before the caller-supplied
    /// options.
    pub fn query_locations(
        &self,
        user: UserId,
        options: &QueryOptions,
        scope: DeletionScope,
    ) -> Vec<LocationRecord> {
        options.apply(visible_locations(&self.registry, user, scope))
    }

    /// The user's visible locations as a flattened tree: ancestor-view
    /// depth, ordered by the root-first name path.
    pub fn flattened_tree(&self, user: UserId, scope: DeletionScope) -> Vec<TreeRow> {
        let view = self.registry.ancestor_view();
        let mut rows: Vec<(Vec<String>, TreeRow)> = visible_locations(&self.registry, user, scope)
            .into_iter()
            .map(|location| {
                let chain = view.ancestors(location.id).unwrap_or(&[]);
                // Path names resolve through any scope: a deleted ancestor
                // still anchors its subtree's position in the listing.
                let mut path: Vec<String> = chain
                    .iter()
                    .filter_map(|id| {
                        self.registry
                            .get_location(*id, DeletionScope::IncludeDeleted)
                            .map(|r| r.name)
                    })
                    .collect();
                path.push(location.name.clone());
                let depth = view.depth(location.id).unwrap_or(0);
                (path, TreeRow { location, depth })
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows.into_iter().map(|(_, row)| row).collect()
    }

    // ─── Dashboards ──────────────────────────────────────────────────

    /// Create a dashboard.
    pub fn create_dashboard(
        &self,
        draft: DashboardDraft,
        actor: UserId,
    ) -> Result<DashboardId, FacadeError> {
        let mut errors = ValidationErrors::new();
        let name = require_text(
            &mut errors,
            "name",
            draft.name.as_deref(),
            NAME_MIN_LEN,
            NAME_MAX_LEN,
        );
        let tenant_id = require_present(&mut errors, "tenant_id", draft.tenant_id);
        errors.into_result(())?;
        let (name, tenant_id) = match (name, tenant_id) {
            (Some(name), Some(tenant_id)) => (name, tenant_id),
            _ => unreachable!("validated fields missing without recorded errors"),
        };

        let id = DashboardId::new();
        self.registry.insert_dashboard(DashboardRecord::new(
            id,
            tenant_id,
            name,
            actor,
            Timestamp::now(),
        ))?;
        Ok(id)
    }

    /// Soft-delete a dashboard.
    pub fn delete_dashboard(&self, id: DashboardId, actor: UserId) -> Result<(), FacadeError> {
        self.registry
            .delete_dashboard(id, actor, Timestamp::now())?;
        Ok(())
    }

    /// The dashboards visible to the user.
    pub fn query_dashboards(&self, user: UserId, scope: DeletionScope) -> Vec<DashboardRecord> {
        visible_dashboards(&self.registry, user, scope)
    }

    /// Create a dashboard option.
    pub fn create_dashboard_option(
        &self,
        draft: DashboardOptionDraft,
        actor: UserId,
    ) -> Result<DashboardOptionId, FacadeError> {
        let mut errors = ValidationErrors::new();
        let key = require_text(&mut errors, "key", draft.key.as_deref(), 1, KEY_MAX_LEN);
        let value = require_text(&mut errors, "value", draft.value.as_deref(), 1, NAME_MAX_LEN);
        let dashboard_id = require_present(&mut errors, "dashboard_id", draft.dashboard_id);
        errors.into_result(())?;
        let (key, value, dashboard_id) = match (key, value, dashboard_id) {
            (Some(key), Some(value), Some(dashboard_id)) => (key, value, dashboard_id),
            _ => unreachable!("validated fields missing without recorded errors"),
        };

        let id = DashboardOptionId::new();
        self.registry
            .insert_dashboard_option(DashboardOptionRecord::new(
                id,
                dashboard_id,
                key,
                value,
                actor,
                Timestamp::now(),
            ))?;
        Ok(id)
    }

    /// Soft-delete a dashboard option.
    pub fn delete_dashboard_option(
        &self,
        id: DashboardOptionId,
        actor: UserId,
    ) -> Result<(), FacadeError> {
        self.registry
            .delete_dashboard_option(id, actor, Timestamp::now())?;
        Ok(())
    }

    /// The dashboard options visible to the user.
    pub fn query_dashboard_options(
        &self,
        user: UserId,
        scope: DeletionScope,
    ) -> Vec<DashboardOptionRecord> {
        visible_dashboard_options(&self.registry, user, scope)
    }

    // ─── Log entries ─────────────────────────────────────────────────

    /// Record a log entry against a location.
    pub fn record_log_entry(
        &self,
        draft: LogEntryDraft,
        actor: UserId,
    ) -> Result<LogEntryId, FacadeError> {
        let mut errors = ValidationErrors::new();
        let message = require_text(
            &mut errors,
            "message",
            draft.message.as_deref(),
            1,
            MESSAGE_MAX_LEN,
        );
        let location_id = require_present(&mut errors, "location_id", draft.location_id);
        errors.into_result(())?;
        let (message, location_id) = match (message, location_id) {
            (Some(message), Some(location_id)) => (message, location_id),
            _ => unreachable!("validated fields missing without recorded errors"),
        };

        let now = Timestamp::now();
        let id = LogEntryId::new();
        self.registry.insert_log_entry(LogEntryRecord::new(
            id,
            location_id,
            message,
            draft.severity,
            draft.recorded_on.unwrap_or(now),
            actor,
            now,
        ))?;
        Ok(id)
    }

    /// Soft-delete a log entry.
    pub fn delete_log_entry(&self, id: LogEntryId, actor: UserId) -> Result<(), FacadeError> {
        self.registry
            .delete_log_entry(id, actor, Timestamp::now())?;
        Ok(())
    }

    /// The log entries visible to the user.
    pub fn query_log_entries(&self, user: UserId, scope: DeletionScope) -> Vec<LogEntryRecord> {
        visible_log_entries(&self.registry, user, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::ValidationKind;

    fn actor() -> UserId {
        UserId::new()
    }

    fn seeded_tenant(directory: &Directory, members: &[UserId]) -> TenantId {
        let admin = actor();
        let tenant = directory
            .create_tenant(
                TenantDraft {
                    name: Some("Acme".to_string()),
                },
                admin,
            )
            .unwrap();
        for member in members {
            directory.add_member(tenant, *member, admin).unwrap();
        }
        tenant
    }

    fn draft(tenant: TenantId, name: &str) -> LocationDraft {
        LocationDraft {
            tenant_id: Some(tenant),
            name: Some(name.to_string()),
            type_id: Some(locus_core::LocationTypeId::new()),
            parent_id: None,
            geometry: None,
        }
    }

    // ── Validation collection ────────────────────────────────────────

    #[test]
    fn test_create_location_collects_all_field_failures() {
        let directory = Directory::new();
        let err = directory
            .create_location(
                LocationDraft {
                    tenant_id: None,
                    name: None,
                    type_id: None,
                    parent_id: None,
                    geometry: Some(crate::dto::RawPoint {
                        latitude: 95.0,
                        longitude: 0.0,
                    }),
                },
                actor(),
            )
            .unwrap_err();

        let errors = match err {
            FacadeError::Validation(errors) => errors,
            other => panic!("expected Validation, got: {other:?}"),
        };
        // Every failure reported together, one round trip.
        assert!(errors.contains("name", ValidationKind::Required));
        assert!(errors.contains("tenant_id", ValidationKind::Required));
        assert!(errors.contains("type_id", ValidationKind::Required));
        assert!(errors.contains("geometry", ValidationKind::InvalidGeometry));
        assert_eq!(errors.errors().len(), 4);
    }

    #[test]
    fn test_create_location_unknown_tenant_is_not_found() {
        let directory = Directory::new();
        let err = directory
            .create_location(draft(TenantId::new(), "Plant 7"), actor())
            .unwrap_err();
        assert!(matches!(
            err,
            FacadeError::Registry(RegistryError::NotFound { kind: "tenant", .. })
        ));
    }

    // ── Audit stamping ───────────────────────────────────────────────

    #[test]
    fn test_create_stamps_creator_and_update_only_modifier() {
        let directory = Directory::new();
        let tenant = seeded_tenant(&directory, &[]);
        let creator = actor();
        let id = directory
            .create_location(draft(tenant, "Plant 7"), creator)
            .unwrap();

        let row = directory
            .registry()
            .get_location(id, DeletionScope::ActiveOnly)
            .unwrap();
        assert_eq!(row.audit.created_by(), creator);
        assert_eq!(row.audit.modified_by(), creator);
        assert_eq!(row.audit.created_on(), row.audit.modified_on());

        let editor = actor();
        directory
            .update_location(
                id,
                LocationUpdate {
                    name: Some("Plant 8".to_string()),
                    ..LocationUpdate::unchanged(1)
                },
                editor,
            )
            .unwrap();

        let row = directory
            .registry()
            .get_location(id, DeletionScope::ActiveOnly)
            .unwrap();
        assert_eq!(row.audit.created_by(), creator);
        assert_eq!(row.audit.modified_by(), editor);
        assert_eq!(row.name, "Plant 8");
    }

    // ── Concurrency ──────────────────────────────────────────────────

    #[test]
    fn test_stale_version_surfaces_conflict() {
        let directory = Directory::new();
        let tenant = seeded_tenant(&directory, &[]);
        let id = directory
            .create_location(draft(tenant, "Plant 7"), actor())
            .unwrap();

        directory
            .update_location(
                id,
                LocationUpdate {
                    name: Some("first".to_string()),
                    ..LocationUpdate::unchanged(1)
                },
                actor(),
            )
            .unwrap();

        let err = directory
            .update_location(
                id,
                LocationUpdate {
                    name: Some("second".to_string()),
                    ..LocationUpdate::unchanged(1)
                },
                actor(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            FacadeError::Registry(RegistryError::ConcurrencyConflict { .. })
        ));
    }

    // ── Queries ──────────────────────────────────────────────────────

    #[test]
    fn test_query_composes_visibility_scope_and_options() {
        let directory = Directory::new();
        let user = actor();
        let tenant = seeded_tenant(&directory, &[user]);
        directory
            .create_location(draft(tenant, "Warehouse North"), user)
            .unwrap();
        directory
            .create_location(draft(tenant, "Warehouse South"), user)
            .unwrap();
        let office = directory
            .create_location(draft(tenant, "Office"), user)
            .unwrap();
        directory.delete_location(office, user).unwrap();

        let options = QueryOptions {
            name_contains: Some("warehouse".to_string()),
            ..Default::default()
        };
        let rows = directory.query_locations(user, &options, DeletionScope::ActiveOnly);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Warehouse North");
        assert_eq!(rows[1].name, "Warehouse South");

        // Deleted row reappears only under the recovery scope, and only if
        // the filter admits it.
        let all = directory.query_locations(user, &QueryOptions::default(), DeletionScope::IncludeDeleted);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_flattened_tree_orders_children_under_parents() {
        let directory = Directory::new();
        let user = actor();
        let tenant = seeded_tenant(&directory, &[user]);
        let campus = directory
            .create_location(draft(tenant, "Campus"), user)
            .unwrap();
        let mut annex = draft(tenant, "Annex");
        annex.parent_id = Some(campus);
        directory.create_location(annex, user).unwrap();
        let mut block_a = draft(tenant, "Block A");
        block_a.parent_id = Some(campus);
        directory.create_location(block_a, user).unwrap();

        let rows = directory.flattened_tree(user, DeletionScope::ActiveOnly);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].location.name, "Campus");
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[1].location.name, "Annex");
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[2].location.name, "Block A");
        assert_eq!(rows[2].depth, 1);
    }

    // ── Hierarchy through the facade ─────────────────────────────────

    #[test]
    fn test_update_with_cyclic_parent_is_a_hierarchy_error() {
        let directory = Directory::new();
        let tenant = seeded_tenant(&directory, &[]);
        let parent = directory
            .create_location(draft(tenant, "Parent"), actor())
            .unwrap();
        let mut child_draft = draft(tenant, "Child");
        child_draft.parent_id = Some(parent);
        let child = directory.create_location(child_draft, actor()).unwrap();

        let err = directory
            .update_location(
                parent,
                LocationUpdate {
                    parent: Some(Some(child)),
                    ..LocationUpdate::unchanged(1)
                },
                actor(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            FacadeError::Hierarchy(HierarchyError::CircularReference { .. })
        ));
    }
}
