//! # Hierarchy Validator — Cycle-Safe Parent Assignment
//!
//! Validates proposed parent links over the location arena. The validation
//! functions here are pure: they take the raw table map, so the registry can
//! run them *inside* the same write-lock critical section as the
//! parent-pointer write. Validating in one lock acquisition and writing in
//! another is unsafe under concurrent reparenting — two individually acyclic
//! proposals can jointly form a cycle when interleaved.
//!
//! ## Invariant
//!
//! The ancestor walk carries a visited-id set, not a step counter. Even if
//! the stored data already contains a cycle (corruption from a prior system),
//! the walk terminates deterministically and reports it; it never treats
//! ambiguous data as an acyclic chain and never loops. A parent id that does
//! not resolve fails closed with `BrokenParentChain`.
//!
//! The walk deliberately ignores `is_deleted`: a soft-deleted ancestor still
//! occupies its structural place in the chain.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use locus_core::{LocationId, TenantId};

use crate::records::LocationRecord;

/// Errors raised by hierarchy validation. These short-circuit — they are not
/// collected alongside per-field validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// The proposed parent assignment would make the candidate its own
    /// ancestor (or the stored chain already loops).
    #[error("assigning parent {proposed_parent} to {candidate} would create a cycle")]
    CircularReference {
        /// The node being reparented.
        candidate: LocationId,
        /// The proposed parent.
        proposed_parent: LocationId,
    },

    /// A parent id in the ancestor chain does not resolve to a stored row.
    /// Fails closed: an unresolvable chain is never treated as acyclic.
    #[error("parent chain is broken: {missing} does not resolve to a stored location")]
    BrokenParentChain {
        /// The id that failed to resolve.
        missing: LocationId,
    },

    /// The proposed parent belongs to a different tenant than the candidate.
    #[error(
        "parent {proposed_parent} belongs to tenant {parent_tenant}, \
         candidate belongs to tenant {candidate_tenant}"
    )]
    TenantMismatch {
        /// The proposed parent.
        proposed_parent: LocationId,
        /// The proposed parent's owning tenant.
        parent_tenant: TenantId,
        /// The candidate's owning tenant.
        candidate_tenant: TenantId,
    },

    /// The candidate itself does not exist.
    #[error("location {0} not found")]
    NotFound(LocationId),
}

/// Would assigning `proposed_parent` as the parent of `candidate` create a
/// cycle?
///
/// Walks the ancestor chain starting at `proposed_parent`. Self-parenting is
/// answered immediately, with no traversal. Returns
/// [`HierarchyError::BrokenParentChain`] if any id along the chain fails to
/// resolve, and reports `Ok(true)` if the stored chain itself already loops —
/// corrupt data must surface as a cycle, not as non-termination.
pub fn would_create_cycle(
    locations: &HashMap<LocationId, LocationRecord>,
    candidate: LocationId,
    proposed_parent: LocationId,
) -> Result<bool, HierarchyError> {
    if proposed_parent == candidate {
        return Ok(true);
    }

    let mut visited: HashSet<LocationId> = HashSet::new();
    let mut current = proposed_parent;
    loop {
        if current == candidate {
            return Ok(true);
        }
        if !visited.insert(current) {
            // Pre-existing cycle in stored data, not involving the candidate.
            return Ok(true);
        }
        let record = locations
            .get(&current)
            .ok_or(HierarchyError::BrokenParentChain { missing: current })?;
        match record.parent_id {
            Some(parent) => current = parent,
            None => return Ok(false),
        }
    }
}

/// Validate a proposed reparent of `candidate` under `proposed_parent`.
///
/// - `None` → the candidate becomes a root: always valid.
/// - Same-tenant parenting is enforced: a parent in another tenant is
///   rejected with [`HierarchyError::TenantMismatch`].
/// - Cycle detection per [`would_create_cycle`].
///
/// Callers must invoke this inside the same critical section as the
/// parent-pointer write.
pub fn validate_reparent(
    locations: &HashMap<LocationId, LocationRecord>,
    candidate: LocationId,
    proposed_parent: Option<LocationId>,
) -> Result<(), HierarchyError> {
    let candidate_record = locations
        .get(&candidate)
        .ok_or(HierarchyError::NotFound(candidate))?;

    let proposed_parent = match proposed_parent {
        Some(parent) => parent,
        None => return Ok(()),
    };

    if proposed_parent == candidate {
        return Err(HierarchyError::CircularReference {
            candidate,
            proposed_parent,
        });
    }

    let parent_record = locations
        .get(&proposed_parent)
        .ok_or(HierarchyError::BrokenParentChain {
            missing: proposed_parent,
        })?;

    if parent_record.tenant_id != candidate_record.tenant_id {
        return Err(HierarchyError::TenantMismatch {
            proposed_parent,
            parent_tenant: parent_record.tenant_id,
            candidate_tenant: candidate_record.tenant_id,
        });
    }

    if would_create_cycle(locations, candidate, proposed_parent)? {
        return Err(HierarchyError::CircularReference {
            candidate,
            proposed_parent,
        });
    }

    Ok(())
}
