//! # locus-facade — Application Service Layer
//!
//! The surface the external transport (HTTP, OData, whatever fronts the
//! system) talks to. Everything below this crate works with validated,
//! strongly typed records; everything above it works with the loose
//! request DTOs defined here.
//!
//! ## Key Design Principles
//!
//! 1. **Exhaustive validation.** A write request is checked field by field
//!    and every failure is collected into one [`ValidationErrors`] response
//!    before anything touches the registry. Persistence-level failures
//!    (missing rows, version conflicts, hierarchy rejections) still
//!    short-circuit.
//! 2. **Provenance at the boundary.** Every mutating operation takes the
//!    acting [`UserId`] and stamps it through [`locus_core::AuditStamp`];
//!    callers never supply audit fields directly.
//! 3. **Scoped reads by default.** Queries run through the tenant
//!    visibility filter in `locus-access` and hide soft-deleted rows
//!    unless the caller explicitly widens the [`DeletionScope`].
//!
//! [`ValidationErrors`]: locus_core::ValidationErrors
//! [`UserId`]: locus_core::UserId
//! [`DeletionScope`]: locus_registry::DeletionScope

pub mod directory;
pub mod dto;
pub mod validation;

pub use directory::{Directory, FacadeError, TreeRow};
pub use dto::{
    DashboardDraft, DashboardOptionDraft, LocationDraft, LocationUpdate, LogEntryDraft, RawPoint,
    TenantDraft,
};
