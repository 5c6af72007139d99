//! # Stored Record Types
//!
//! One record type per table. Every record carries the soft-delete flag, the
//! audit stamp, and a version token for optimistic concurrency. Rows are
//! never physically removed — deletion flips `is_deleted` and nothing else.
//!
//! The [`StoredRecord`] trait gives the registry a uniform handle on those
//! shared columns, so soft delete and version bookkeeping are written once.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use locus_core::{
    AuditStamp, DashboardId, DashboardOptionId, GeoPoint, LocationId, LocationTypeId, LogEntryId,
    OfferingId, TenantId, Timestamp, UserId,
};

/// Columns shared by every stored record kind.
pub trait StoredRecord {
    /// Whether the row is logically deleted.
    fn is_deleted(&self) -> bool;

    /// Flip the row to logically deleted. There is no inverse.
    fn mark_deleted(&mut self);

    /// The audit stamp, for refreshing modification provenance.
    fn audit_mut(&mut self) -> &mut AuditStamp;

    /// The current optimistic-concurrency version.
    fn version(&self) -> u64;

    /// Advance the version token after a committed write.
    fn bump_version(&mut self);
}

macro_rules! impl_stored_record {
    ($record:ty) => {
        impl StoredRecord for $record {
            fn is_deleted(&self) -> bool {
                self.is_deleted
            }

            fn mark_deleted(&mut self) {
                self.is_deleted = true;
            }

            fn audit_mut(&mut self) -> &mut AuditStamp {
                &mut self.audit
            }

            fn version(&self) -> u64 {
                self.version
            }

            fn bump_version(&mut self) {
                self.version += 1;
            }
        }
    };
}

// ─── Location ────────────────────────────────────────────────────────

/// A node in the hierarchy forest.
///
/// `parent_id` is the self-referencing link; `None` means root. A deleted
/// location keeps its row and its children keep pointing at it — dangling
/// but inert, filtered out of default reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: LocationId,
    pub tenant_id: TenantId,
    pub name: String,
    pub type_id: LocationTypeId,
    pub parent_id: Option<LocationId>,
    pub geometry: Option<GeoPoint>,
    pub is_deleted: bool,
    pub audit: AuditStamp,
    pub version: u64,
}

impl LocationRecord {
    /// Create a location row stamped with the acting user's provenance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LocationId,
        tenant_id: TenantId,
        name: String,
        type_id: LocationTypeId,
        parent_id: Option<LocationId>,
        geometry: Option<GeoPoint>,
        actor: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            tenant_id,
            name,
            type_id,
            parent_id,
            geometry,
            is_deleted: false,
            audit: AuditStamp::create(actor, now),
            version: 1,
        }
    }
}

impl_stored_record!(LocationRecord);

// ─── Tenant ──────────────────────────────────────────────────────────

/// An access-scoping boundary. Users belong to tenants; every location,
/// dashboard, and (transitively) log entry is owned by exactly one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRecord {
    pub id: TenantId,
    pub name: String,
    /// Member users (many-to-many with users).
    pub members: HashSet<UserId>,
    /// Product offerings this tenant subscribes to.
    pub offerings: HashSet<OfferingId>,
    pub is_deleted: bool,
    pub audit: AuditStamp,
    pub version: u64,
}

impl TenantRecord {
    /// Create a tenant row with no members or offerings yet.
    pub fn new(id: TenantId, name: String, actor: UserId, now: Timestamp) -> Self {
        Self {
            id,
            name,
            members: HashSet::new(),
            offerings: HashSet::new(),
            is_deleted: false,
            audit: AuditStamp::create(actor, now),
            version: 1,
        }
    }

    /// Whether the given user is a member of this tenant.
    pub fn has_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }
}

impl_stored_record!(TenantRecord);

// ─── Dashboard ───────────────────────────────────────────────────────

/// A dashboard owned by a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRecord {
    pub id: DashboardId,
    pub tenant_id: TenantId,
    pub name: String,
    pub is_deleted: bool,
    pub audit: AuditStamp,
    pub version: u64,
}

impl DashboardRecord {
    /// Create a dashboard row stamped with the acting user's provenance.
    pub fn new(
        id: DashboardId,
        tenant_id: TenantId,
        name: String,
        actor: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            tenant_id,
            name,
            is_deleted: false,
            audit: AuditStamp::create(actor, now),
            version: 1,
        }
    }
}

impl_stored_record!(DashboardRecord);

// ─── Dashboard Option ────────────────────────────────────────────────

/// A key/value setting row belonging to a dashboard. Visibility derives from
/// the owning dashboard's tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOptionRecord {
    pub id: DashboardOptionId,
    pub dashboard_id: DashboardId,
    pub key: String,
    pub value: String,
    pub is_deleted: bool,
    pub audit: AuditStamp,
    pub version: u64,
}

impl DashboardOptionRecord {
    /// Create an option row stamped with the acting user's provenance.
    pub fn new(
        id: DashboardOptionId,
        dashboard_id: DashboardId,
        key: String,
        value: String,
        actor: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            dashboard_id,
            key,
            value,
            is_deleted: false,
            audit: AuditStamp::create(actor, now),
            version: 1,
        }
    }
}

impl_stored_record!(DashboardOptionRecord);

// ─── Log Entry ───────────────────────────────────────────────────────

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// The canonical string name of this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operational log entry recorded against a location.
///
/// Visibility is the long join: entry → owning location →
/// tenant–offering–location association → tenant membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryRecord {
    pub id: LogEntryId,
    pub location_id: LocationId,
    pub message: String,
    pub severity: Severity,
    /// When the logged event occurred (distinct from the audit stamp, which
    /// records when the row was written).
    pub recorded_on: Timestamp,
    pub is_deleted: bool,
    pub audit: AuditStamp,
    pub version: u64,
}

impl LogEntryRecord {
    /// Create a log entry row stamped with the acting user's provenance.
    pub fn new(
        id: LogEntryId,
        location_id: LocationId,
        message: String,
        severity: Severity,
        recorded_on: Timestamp,
        actor: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            location_id,
            message,
            severity,
            recorded_on,
            is_deleted: false,
            audit: AuditStamp::create(actor, now),
            version: 1,
        }
    }
}

impl_stored_record!(LogEntryRecord);

// ─── Tenant–Offering–Location Association ────────────────────────────

/// One row of the tenant–offering–location association.
///
/// A log entry is reachable for a user when some association row ties the
/// entry's location to a tenant the user belongs to, through an offering
/// that tenant actually subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantOfferingLocation {
    pub tenant_id: TenantId,
    pub offering_id: OfferingId,
    pub location_id: LocationId,
}
