//! # locus-core — Foundational Types for Locus
//!
//! This crate is the bedrock of the Locus workspace. It defines the
//! type-system primitives that enforce correctness guarantees at compile
//! time. Every other crate in the workspace depends on `locus-core`; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `LocationId`, `TenantId`,
//!    `UserId`, `DashboardId`, ... — all UUID newtypes. No bare strings or
//!    raw UUIDs cross an API boundary.
//!
//! 2. **Creation-immutable audit stamps.** `AuditStamp` has no setter for
//!    its creation pair; provenance cannot be rewritten after the fact.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC and seconds
//!    precision on every read and deserialize path — there is no
//!    runtime-attribute date coercion anywhere in the system.
//!
//! 4. **Validated geometry.** `GeoPoint` rejects out-of-range coordinates at
//!    construction, including on deserialize.
//!
//! 5. **Collected validation errors.** `ValidationErrors` accumulates every
//!    field failure for a request before returning, so clients correct a
//!    whole form in one round trip.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `locus-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod audit;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use audit::AuditStamp;
pub use error::{FieldError, ValidationErrors, ValidationKind};
pub use geometry::{GeoPoint, GeometryError};
pub use identity::{
    DashboardId, DashboardOptionId, LocationId, LocationTypeId, LogEntryId, OfferingId, TenantId,
    UserId,
};
pub use temporal::{Timestamp, TimestampError};
