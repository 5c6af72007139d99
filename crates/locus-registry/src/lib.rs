//! # locus-registry — The Locus Entity Store
//!
//! Implements the storage core of Locus: one thread-safe arena table per
//! entity kind, per-query soft-delete scoping, cycle-safe hierarchy
//! validation, optimistic concurrency, and the materialized ancestor view.
//!
//! ## Modules
//!
//! - **table** (`table.rs`): generic `Table<K, R>` arena over
//!   `parking_lot::RwLock`. Its `write_with` closure is the all-or-nothing
//!   commit unit.
//!
//! - **records** (`records.rs`): one record type per table, each carrying
//!   the soft-delete flag, audit stamp, and version token.
//!
//! - **scope** (`scope.rs`): `DeletionScope`, the per-query soft-delete
//!   predicate. A value passed with each read — never process-wide state.
//!
//! - **query** (`query.rs`): caller-supplied filter/sort/paging, applied
//!   after access filters.
//!
//! - **hierarchy** (`hierarchy.rs`): visited-set cycle detection and
//!   reparent validation, written as pure functions so the registry can run
//!   them inside the same critical section as the write.
//!
//! - **ancestry** (`ancestry.rs`): the materialized ancestor view backing
//!   flattened tree listings.
//!
//! - **registry** (`registry.rs`): the table-of-tables facade, association
//!   rows, and the ancestor view cache with write invalidation.
//!
//! ## Design
//!
//! Reparenting is the hard invariant here: two concurrent proposals that
//! each look acyclic can jointly form a cycle. The registry therefore never
//! validates in one lock acquisition and writes in another — `reparent` and
//! `update_location` run validation and mutation inside a single
//! `write_with` closure on the location table.

pub mod ancestry;
pub mod hierarchy;
pub mod query;
pub mod records;
pub mod registry;
pub mod scope;
pub mod table;

// ─── Re-exports ──────────────────────────────────────────────────────

pub use ancestry::AncestorView;
pub use hierarchy::{validate_reparent, would_create_cycle, HierarchyError};
pub use query::{QueryOptions, SortKey};
pub use records::{
    DashboardOptionRecord, DashboardRecord, LocationRecord, LogEntryRecord, Severity,
    StoredRecord, TenantOfferingLocation, TenantRecord,
};
pub use registry::{LocationChanges, Registry, RegistryError};
pub use scope::DeletionScope;
pub use table::Table;
