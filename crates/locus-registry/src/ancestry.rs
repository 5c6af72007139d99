//! # Materialized Ancestor View
//!
//! A read-optimized snapshot of every location's ancestor chain, precomputed
//! so listing queries can render a flattened tree without re-walking the
//! parent graph per row. The view is derived data: the registry rebuilds it
//! lazily and throws it away on every write that touches parent linkage or
//! deletion state.
//!
//! The view is *not* a correctness gate. Chains that hit a missing parent or
//! a pre-existing cycle are truncated at the last resolvable ancestor; the
//! hierarchy validator is what keeps such data from being written.

use std::collections::{HashMap, HashSet};

use locus_core::LocationId;

use crate::records::LocationRecord;

/// Precomputed root-first ancestor chains for every stored location.
#[derive(Debug, Clone, Default)]
pub struct AncestorView {
    /// Ancestors of each location, root first, excluding the location itself.
    chains: HashMap<LocationId, Vec<LocationId>>,
}

impl AncestorView {
    /// Build the view from a snapshot of the location table.
    pub fn build(locations: &HashMap<LocationId, LocationRecord>) -> Self {
        let mut chains = HashMap::with_capacity(locations.len());
        for id in locations.keys() {
            chains.insert(*id, ancestors_of(locations, *id));
        }
        Self { chains }
    }

    /// The ancestor chain of a location, root first. `None` if the location
    /// was not in the snapshot.
    pub fn ancestors(&self, id: LocationId) -> Option<&[LocationId]> {
        self.chains.get(&id).map(Vec::as_slice)
    }

    /// Depth of a location (root = 0).
    pub fn depth(&self, id: LocationId) -> Option<usize> {
        self.chains.get(&id).map(Vec::len)
    }

    /// Whether `descendant` sits below `ancestor` in the snapshot.
    pub fn is_descendant_of(&self, descendant: LocationId, ancestor: LocationId) -> bool {
        self.chains
            .get(&descendant)
            .is_some_and(|chain| chain.contains(&ancestor))
    }

    /// Number of locations in the snapshot.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Walk one location's ancestor chain, root first.
///
/// Truncates at an unresolvable parent or a repeated id; this is a view
/// builder, not a validator.
fn ancestors_of(
    locations: &HashMap<LocationId, LocationRecord>,
    id: LocationId,
) -> Vec<LocationId> {
    let mut chain = Vec::new();
    let mut visited: HashSet<LocationId> = HashSet::new();
    visited.insert(id);

    let mut current = match locations.get(&id).and_then(|r| r.parent_id) {
        Some(parent) => parent,
        None => return chain,
    };

    loop {
        if !visited.insert(current) {
            break;
        }
        let record = match locations.get(&current) {
            Some(record) => record,
            None => break,
        };
        chain.push(current);
        match record.parent_id {
            Some(parent) => current = parent,
            None => break,
        }
    }

    chain.reverse();
    chain
}
