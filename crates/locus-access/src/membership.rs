//! # Membership Index
//!
//! An inverted index from user to the tenants they belong to, built from a
//! tenant table snapshot. Deleted tenants are excluded at build time: a
//! membership in a soft-deleted tenant is an inert grant that confers no
//! visibility.

use std::collections::{HashMap, HashSet};

use locus_core::{TenantId, UserId};
use locus_registry::{StoredRecord, TenantRecord};

/// User → tenants inverted index over a snapshot of the tenant table.
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    tenants_by_user: HashMap<UserId, HashSet<TenantId>>,
}

impl MembershipIndex {
    /// Build the index from a tenant snapshot, skipping deleted tenants.
    pub fn build(tenants: &[TenantRecord]) -> Self {
        let mut tenants_by_user: HashMap<UserId, HashSet<TenantId>> = HashMap::new();
        for tenant in tenants.iter().filter(|t| !t.is_deleted()) {
            for member in &tenant.members {
                tenants_by_user.entry(*member).or_default().insert(tenant.id);
            }
        }
        Self { tenants_by_user }
    }

    /// The tenants the user belongs to. Empty for unknown users.
    pub fn tenants_of(&self, user: UserId) -> HashSet<TenantId> {
        self.tenants_by_user.get(&user).cloned().unwrap_or_default()
    }

    /// Whether the user belongs to the given tenant.
    pub fn is_member(&self, user: UserId, tenant: TenantId) -> bool {
        self.tenants_by_user
            .get(&user)
            .is_some_and(|set| set.contains(&tenant))
    }
}
