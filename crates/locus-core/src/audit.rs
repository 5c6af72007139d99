//! # Audit Stamps — Creation-Immutable Provenance
//!
//! Every mutable record in Locus carries an [`AuditStamp`]: who created it
//! and when, who last modified it and when.
//!
//! ## Invariant
//!
//! The creation pair (`created_by`, `created_on`) is set exactly once, at
//! construction, and can never be reassigned afterwards. This is enforced by
//! construction — the fields are private and no setter for them exists — so
//! a call site cannot get it wrong, and no per-call-site validation is
//! needed. The modification pair is refreshed through [`AuditStamp::touch`]
//! on every subsequent write.

use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::temporal::Timestamp;

/// Creation and modification provenance for a record.
///
/// Serializes with all four fields visible; deserialization reconstructs the
/// stamp as stored (persistence round-trips must not re-stamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    created_by: UserId,
    created_on: Timestamp,
    modified_by: UserId,
    modified_on: Timestamp,
}

impl AuditStamp {
    /// Stamp a freshly created record.
    ///
    /// Sets all four fields: the creation pair and the modification pair are
    /// identical at birth.
    pub fn create(actor: UserId, now: Timestamp) -> Self {
        Self {
            created_by: actor,
            created_on: now,
            modified_by: actor,
            modified_on: now,
        }
    }

    /// Refresh the modification pair for a subsequent write.
    ///
    /// The creation pair is untouched — there is no way to reassign it.
    pub fn touch(&mut self, actor: UserId, now: Timestamp) {
        self.modified_by = actor;
        self.modified_on = now;
    }

    /// The user who created the record.
    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    /// When the record was created.
    pub fn created_on(&self) -> Timestamp {
        self.created_on
    }

    /// The user who last modified the record.
    pub fn modified_by(&self) -> UserId {
        self.modified_by
    }

    /// When the record was last modified.
    pub fn modified_on(&self) -> Timestamp {
        self.modified_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(secs: u32) -> Timestamp {
        Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, secs).unwrap())
    }

    #[test]
    fn test_create_sets_all_four_fields() {
        let actor = UserId::new();
        let now = at(0);
        let stamp = AuditStamp::create(actor, now);

        assert_eq!(stamp.created_by(), actor);
        assert_eq!(stamp.modified_by(), actor);
        assert_eq!(stamp.created_on(), now);
        assert_eq!(stamp.modified_on(), now);
    }

    #[test]
    fn test_touch_refreshes_only_modification_pair() {
        let creator = UserId::new();
        let editor = UserId::new();
        let mut stamp = AuditStamp::create(creator, at(0));

        stamp.touch(editor, at(30));

        assert_eq!(stamp.created_by(), creator);
        assert_eq!(stamp.created_on(), at(0));
        assert_eq!(stamp.modified_by(), editor);
        assert_eq!(stamp.modified_on(), at(30));
    }

    #[test]
    fn test_repeated_touch_keeps_latest() {
        let creator = UserId::new();
        let mut stamp = AuditStamp::create(creator, at(0));

        let first_editor = UserId::new();
        let second_editor = UserId::new();
        stamp.touch(first_editor, at(10));
        stamp.touch(second_editor, at(20));

        assert_eq!(stamp.modified_by(), second_editor);
        assert_eq!(stamp.modified_on(), at(20));
        assert_eq!(stamp.created_by(), creator);
    }

    #[test]
    fn test_serde_roundtrip_preserves_creation_pair() {
        let creator = UserId::new();
        let mut stamp = AuditStamp::create(creator, at(0));
        stamp.touch(UserId::new(), at(30));

        let json = serde_json::to_string(&stamp).unwrap();
        let parsed: AuditStamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stamp);
    }
}
