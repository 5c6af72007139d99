//! # Request DTOs
//!
//! The wire-shaped inputs the external HTTP/OData layer hands to the
//! facade. Fields arrive unvalidated (names may be blank, coordinates out of
//! range); `validation.rs` turns a draft into validated domain values or an
//! exhaustive list of field failures.

use serde::{Deserialize, Serialize};

use locus_core::{DashboardId, LocationId, LocationTypeId, TenantId, Timestamp};
use locus_registry::Severity;

/// An unvalidated coordinate pair as received from the caller.
///
/// Deliberately not [`locus_core::GeoPoint`]: the raw pair must be able to
/// represent out-of-range input so validation can report it as a field
/// failure instead of a deserialization error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Draft for creating a location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationDraft {
    pub tenant_id: Option<TenantId>,
    pub name: Option<String>,
    pub type_id: Option<LocationTypeId>,
    pub parent_id: Option<LocationId>,
    pub geometry: Option<RawPoint>,
}

/// Changes for updating a location. `None` leaves a field untouched; the
/// doubled `Option` on `parent` and `geometry` distinguishes "leave as is"
/// from "clear".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub name: Option<String>,
    pub type_id: Option<LocationTypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Option<LocationId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Option<RawPoint>>,
    /// The version the caller read before editing; a mismatch at commit time
    /// is a concurrency conflict.
    pub expected_version: u64,
}

impl LocationUpdate {
    /// An update that changes nothing, against the given version.
    pub fn unchanged(expected_version: u64) -> Self {
        Self {
            name: None,
            type_id: None,
            parent: None,
            geometry: None,
            expected_version,
        }
    }
}

/// Draft for creating a tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantDraft {
    pub name: Option<String>,
}

/// Draft for creating a dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardDraft {
    pub tenant_id: Option<TenantId>,
    pub name: Option<String>,
}

/// Draft for creating a dashboard option.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardOptionDraft {
    pub dashboard_id: Option<DashboardId>,
    pub key: Option<String>,
    pub value: Option<String>,
}

/// Draft for recording a log entry against a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryDraft {
    pub location_id: Option<LocationId>,
    pub message: Option<String>,
    pub severity: Severity,
    /// When the logged event occurred; defaults to the write time.
    pub recorded_on: Option<Timestamp>,
}
