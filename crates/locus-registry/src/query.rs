//! # Query Options — Caller-Supplied Filter, Sort, and Paging
//!
//! Applied *after* the tenant and soft-delete filters: a caller cannot page
//! or filter their way into rows the access filters already excluded.

use serde::{Deserialize, Serialize};

use locus_core::LocationTypeId;

use crate::records::LocationRecord;

/// Sort key for location listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Case-insensitive by name (default).
    #[default]
    Name,
    /// Oldest first by creation time.
    CreatedOn,
    /// Oldest first by last modification time.
    ModifiedOn,
}

/// Caller-supplied predicate, sort, and paging parameters for a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Case-insensitive substring match on the name.
    pub name_contains: Option<String>,
    /// Restrict to one location type.
    pub type_id: Option<LocationTypeId>,
    /// Sort order.
    pub sort: SortKey,
    /// Rows to skip before the page starts.
    pub skip: usize,
    /// Page size; `None` means unbounded.
    pub take: Option<usize>,
}

impl QueryOptions {
    /// Whether a record passes the caller-supplied predicates.
    pub fn matches(&self, record: &LocationRecord) -> bool {
        if let Some(needle) = &self.name_contains {
            if !record
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(type_id) = self.type_id {
            if record.type_id != type_id {
                return false;
            }
        }
        true
    }

    /// Filter, sort, and page an already access-scoped row set.
    pub fn apply(&self, rows: Vec<LocationRecord>) -> Vec<LocationRecord> {
        let mut rows: Vec<LocationRecord> = rows.into_iter().filter(|r| self.matches(r)).collect();

        match self.sort {
            SortKey::Name => rows.sort_by_key(|r| r.name.to_lowercase()),
            SortKey::CreatedOn => rows.sort_by_key(|r| r.audit.created_on()),
            SortKey::ModifiedOn => rows.sort_by_key(|r| r.audit.modified_on()),
        }

        let iter = rows.into_iter().skip(self.skip);
        match self.take {
            Some(take) => iter.take(take).collect(),
            None => iter.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::{LocationId, TenantId, Timestamp, UserId};

    fn location(name: &str, type_id: LocationTypeId) -> LocationRecord {
        LocationRecord::new(
            LocationId::new(),
            TenantId::new(),
            name.to_string(),
            type_id,
            None,
            None,
            UserId::new(),
            Timestamp::now(),
        )
    }

    #[test]
    fn test_default_options_pass_everything_through_sorted() {
        let t = LocationTypeId::new();
        let rows = vec![location("zeta", t), location("Alpha", t)];
        let out = QueryOptions::default().apply(rows);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Alpha");
        assert_eq!(out[1].name, "zeta");
    }

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let t = LocationTypeId::new();
        let rows = vec![location("Warehouse North", t), location("Office", t)];
        let options = QueryOptions {
            name_contains: Some("wareHOUSE".to_string()),
            ..Default::default()
        };
        let out = options.apply(rows);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Warehouse North");
    }

    #[test]
    fn test_type_filter() {
        let site = LocationTypeId::new();
        let floor = LocationTypeId::new();
        let rows = vec![location("A", site), location("B", floor), location("C", site)];
        let options = QueryOptions {
            type_id: Some(site),
            ..Default::default()
        };
        assert_eq!(options.apply(rows).len(), 2);
    }

    #[test]
    fn test_paging_applies_after_sort() {
        let t = LocationTypeId::new();
        let rows = vec![
            location("c", t),
            location("a", t),
            location("d", t),
            location("b", t),
        ];
        let options = QueryOptions {
            skip: 1,
            take: Some(2),
            ..Default::default()
        };
        let out = options.apply(rows);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "b");
        assert_eq!(out[1].name, "c");
    }

    #[test]
    fn test_skip_past_end_yields_empty_page() {
        let t = LocationTypeId::new();
        let rows = vec![location("a", t)];
        let options = QueryOptions {
            skip: 5,
            ..Default::default()
        };
        assert!(options.apply(rows).is_empty());
    }
}
