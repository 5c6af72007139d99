//! # locus-access — Tenant-Scoped Visibility
//!
//! Computes the visible subset of entities for a user based on tenant
//! membership, de-duplicated across multiple membership paths, composed
//! conjunctively with the per-query soft-delete scope.
//!
//! The rules in one place:
//!
//! - **Locations, dashboards**: visible iff the user belongs to the owning
//!   tenant.
//! - **Dashboard options**: visible iff the owning dashboard is.
//! - **Log entries**: visible iff the owning location is reachable through a
//!   tenant–offering–location association for one of the user's tenants —
//!   membership alone is not enough.
//!
//! Visibility reads take no locks beyond the registry's per-table read
//! locks; they tolerate milliseconds of staleness by design.

pub mod membership;
pub mod visibility;

pub use membership::MembershipIndex;
pub use visibility::{
    reachable_location_ids, visible_dashboard_options, visible_dashboards, visible_locations,
    visible_log_entries,
};
