//! # Domain Identity Newtypes
//!
//! Newtype wrappers for every identifier namespace in Locus. These prevent
//! accidental identifier confusion — you cannot pass a `UserId` where a
//! `TenantId` is expected, and a `LocationId` fished out of a log entry
//! cannot silently stand in for a `DashboardId`.
//!
//! ## Invariant
//!
//! Type-level distinction between identifier namespaces means a cross-kind
//! mixup is a compile error, not a data-corruption incident discovered in
//! production.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a location (a node in the hierarchy forest).
    LocationId, "location"
}

define_id! {
    /// Unique identifier for a tenant (an access-scoping boundary).
    TenantId, "tenant"
}

define_id! {
    /// Unique identifier for a user.
    UserId, "user"
}

define_id! {
    /// Unique identifier for a product offering associated with a tenant.
    OfferingId, "offering"
}

define_id! {
    /// Unique identifier for a dashboard.
    DashboardId, "dashboard"
}

define_id! {
    /// Unique identifier for a dashboard option (a key/value setting row).
    DashboardOptionId, "dashboard-option"
}

define_id! {
    /// Unique identifier for a log entry recorded against a location.
    LogEntryId, "log-entry"
}

define_id! {
    /// Unique identifier for a location type (site, building, floor, zone...).
    LocationTypeId, "location-type"
}
