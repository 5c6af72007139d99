//! # Generic In-Memory Table
//!
//! Thread-safe, cloneable arena keyed by a typed identifier. One `Table` per
//! entity kind — the in-memory equivalent of one relational table per kind.
//!
//! All operations are synchronous (the RwLock is `parking_lot`, not
//! `tokio::sync`) because a lock is never held across an `.await` point.
//! `parking_lot::RwLock` is non-poisonable, so a panicking writer does not
//! permanently corrupt the table.
//!
//! The closure-based [`Table::write_with`] is the concurrency primitive the
//! hierarchy validator builds on: a validation read and the subsequent write
//! execute under one write lock, so two interleaved reparenting operations
//! cannot jointly slip a cycle past validation.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

/// Thread-safe, cloneable in-memory table keyed by a typed identifier.
#[derive(Debug)]
pub struct Table<K, R> {
    data: Arc<RwLock<HashMap<K, R>>>,
}

impl<K, R> Clone for Table<K, R> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K, R> Default for Table<K, R>
where
    K: Eq + Hash + Clone,
    R: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, R> Table<K, R>
where
    K: Eq + Hash + Clone,
    R: Clone,
{
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: K, record: R) -> Option<R> {
        self.data.write().insert(id, record)
    }

    /// Retrieve a record by id.
    pub fn get(&self, id: &K) -> Option<R> {
        self.data.read().get(id).cloned()
    }

    /// List all records, deleted rows included; callers apply scoping.
    pub fn list(&self) -> Vec<R> {
        self.data.read().values().cloned().collect()
    }

    /// Check if a record exists (regardless of deletion state).
    pub fn contains(&self, id: &K) -> bool {
        self.data.read().contains_key(id)
    }

    /// Number of rows, deleted rows included.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the table holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run a closure against the table under a read lock.
    pub fn read_with<T>(&self, f: impl FnOnce(&HashMap<K, R>) -> T) -> T {
        f(&self.data.read())
    }

    /// Run a closure against the table under a single write lock.
    ///
    /// The closure may read, validate, and mutate; no other reader or writer
    /// observes an intermediate state. This is the all-or-nothing commit
    /// unit: a closure that returns `Err` before mutating leaves the table
    /// untouched.
    pub fn write_with<T>(&self, f: impl FnOnce(&mut HashMap<K, R>) -> T) -> T {
        f(&mut self.data.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_empty() {
        let table: Table<u32, String> = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.list().is_empty());
    }

    #[test]
    fn test_insert_and_get_roundtrip() {
        let table = Table::new();
        assert!(table.insert(1, "first".to_string()).is_none());
        assert_eq!(table.get(&1).as_deref(), Some("first"));
        assert!(table.get(&2).is_none());
    }

    #[test]
    fn test_insert_returns_previous_value() {
        let table = Table::new();
        table.insert(1, "first".to_string());
        let prev = table.insert(1, "second".to_string());
        assert_eq!(prev.as_deref(), Some("first"));
        assert_eq!(table.get(&1).as_deref(), Some("second"));
    }

    #[test]
    fn test_contains_and_len() {
        let table = Table::new();
        assert!(!table.contains(&7));
        table.insert(7, "x".to_string());
        assert!(table.contains(&7));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_write_with_is_atomic_per_closure() {
        let table = Table::new();
        table.insert(1, 10u32);
        let doubled = table.write_with(|map| {
            let current = *map.get(&1).unwrap();
            map.insert(1, current * 2);
            current * 2
        });
        assert_eq!(doubled, 20);
        assert_eq!(table.get(&1), Some(20));
    }

    #[test]
    fn test_write_with_error_before_mutation_leaves_table_untouched() {
        let table = Table::new();
        table.insert(1, 10u32);
        let result: Result<(), &str> = table.write_with(|map| {
            if map.contains_key(&1) {
                return Err("precondition failed");
            }
            map.insert(2, 20);
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_clone_shares_underlying_data() {
        let table = Table::new();
        table.insert(1, "shared".to_string());

        let clone = table.clone();
        clone.insert(2, "also shared".to_string());
        assert_eq!(table.len(), 2);
    }
}
