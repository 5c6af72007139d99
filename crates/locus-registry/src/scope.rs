//! # Deletion Scope — Per-Query Soft-Delete Predicate
//!
//! The soft-delete filter is a *value* passed with every read, never a
//! process-wide toggle. Two concurrent reads with different scopes cannot
//! observe each other's setting, because there is no shared setting to
//! observe.

use serde::{Deserialize, Serialize};

use crate::records::StoredRecord;

/// Which rows a read operation may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionScope {
    /// Default: logically deleted rows are invisible.
    #[default]
    ActiveOnly,
    /// Administrative recovery views: deleted rows included.
    IncludeDeleted,
}

impl DeletionScope {
    /// Whether a row with the given deletion flag is visible in this scope.
    pub fn admits(&self, is_deleted: bool) -> bool {
        match self {
            Self::ActiveOnly => !is_deleted,
            Self::IncludeDeleted => true,
        }
    }

    /// Whether the given record is visible in this scope.
    pub fn admits_record<R: StoredRecord>(&self, record: &R) -> bool {
        self.admits(record.is_deleted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scope_hides_deleted() {
        let scope = DeletionScope::default();
        assert_eq!(scope, DeletionScope::ActiveOnly);
        assert!(scope.admits(false));
        assert!(!scope.admits(true));
    }

    #[test]
    fn test_include_deleted_admits_everything() {
        let scope = DeletionScope::IncludeDeleted;
        assert!(scope.admits(false));
        assert!(scope.admits(true));
    }

    #[test]
    fn test_scopes_are_independent_values() {
        // Two scopes held at once do not interact.
        let a = DeletionScope::ActiveOnly;
        let b = DeletionScope::IncludeDeleted;
        assert!(!a.admits(true));
        assert!(b.admits(true));
        assert!(!a.admits(true));
    }
}
