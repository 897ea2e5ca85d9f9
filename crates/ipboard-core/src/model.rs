//! Data model for the IP-address table
//!
//! Wire-facing record types plus the draft/patch pair that drives
//! diff-based updates. Field names follow the remote service's JSON
//! payloads so the types serialize directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity snapshot of a user, as supplied by the session collaborator
///
/// Immutable for the lifetime of a session; row-level capabilities are
/// derived from it (see [`can_edit_record`] / [`can_delete_record`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Unique user id
    pub id: i64,
    /// Username, displayed next to each record
    pub username: String,
    /// Superusers may edit and delete any record
    pub is_superuser: bool,
}

/// One IP-address record as fetched from the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRecord {
    /// Unique, immutable record id
    pub id: i64,
    /// The IP address text; syntactic validity is enforced server-side
    pub ip_address: String,
    /// Human-readable label; unique across all records (server-enforced)
    pub label: String,
    /// Free-form comment, may be empty
    pub comment: String,
    /// Creation timestamp
    pub created_on: DateTime<Utc>,
    /// The user who recorded this address
    pub recorder: UserRef,
}

impl IpRecord {
    /// The editable field set of this record
    pub fn draft(&self) -> RecordDraft {
        RecordDraft {
            ip_address: self.ip_address.clone(),
            label: self.label.clone(),
            comment: self.comment.clone(),
        }
    }
}

/// One page of records as returned by a single fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPage {
    /// Total number of records across all pages
    pub num_total_items: u64,
    /// Number of records in this page
    pub count: usize,
    /// The page number the server actually served (may differ from the
    /// requested one if the server clamped it)
    pub page_number: u32,
    /// The records, in server order
    pub ips: Vec<IpRecord>,
}

/// The three editable fields of a record, fully resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub ip_address: String,
    pub label: String,
    pub comment: String,
}

impl RecordDraft {
    /// Compute the minimal diff from `self` (the committed values) to `new`
    ///
    /// Unchanged fields come back as `None`, the explicit "no update"
    /// sentinel. Identical values are never re-sent.
    pub fn diff(&self, new: &RecordDraft) -> RecordPatch {
        RecordPatch {
            ip_address: (new.ip_address != self.ip_address).then(|| new.ip_address.clone()),
            label: (new.label != self.label).then(|| new.label.clone()),
            comment: (new.comment != self.comment).then(|| new.comment.clone()),
        }
    }
}

/// A diff-based update request
///
/// `None` means "no change" and is omitted from the wire payload entirely;
/// `Some` carries the new value, including an empty string for a cleared
/// comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RecordPatch {
    /// True if no field changed
    pub fn is_empty(&self) -> bool {
        self.ip_address.is_none() && self.label.is_none() && self.comment.is_none()
    }
}

/// Whether `user` may edit a record recorded by `recorder`
///
/// Owners may edit their own records; superusers may edit any.
pub fn can_edit_record(user: &UserRef, recorder: &UserRef) -> bool {
    user.id == recorder.id || user.is_superuser
}

/// Whether `user` may delete records
///
/// Deletion is reserved to superusers, regardless of ownership.
pub fn can_delete_record(user: &UserRef) -> bool {
    user.is_superuser
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(ip: &str, label: &str, comment: &str) -> RecordDraft {
        RecordDraft {
            ip_address: ip.to_string(),
            label: label.to_string(),
            comment: comment.to_string(),
        }
    }

    #[test]
    fn diff_of_identical_drafts_is_empty() {
        let committed = draft("1.2.3.4", "L1", "c");
        let patch = committed.diff(&committed.clone());
        assert!(patch.is_empty());
    }

    #[test]
    fn diff_carries_only_changed_fields() {
        let committed = draft("1.2.3.4", "L1", "c");
        let edited = draft("1.2.3.4", "L1", "c2");

        let patch = committed.diff(&edited);
        assert_eq!(patch.ip_address, None);
        assert_eq!(patch.label, None);
        assert_eq!(patch.comment, Some("c2".to_string()));
    }

    #[test]
    fn diff_sends_cleared_comment_as_empty_string() {
        // An emptied comment is a real change, not a "no update" sentinel.
        let committed = draft("1.2.3.4", "L1", "old comment");
        let edited = draft("1.2.3.4", "L1", "");

        let patch = committed.diff(&edited);
        assert_eq!(patch.comment, Some(String::new()));
    }

    #[test]
    fn patch_serializes_without_unchanged_fields() {
        let patch = RecordPatch {
            ip_address: None,
            label: Some("L2".to_string()),
            comment: None,
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "label": "L2" }));
    }

    #[test]
    fn capability_matrix() {
        let owner = UserRef {
            id: 1,
            username: "alice".to_string(),
            is_superuser: false,
        };
        let stranger = UserRef {
            id: 2,
            username: "bob".to_string(),
            is_superuser: false,
        };
        let admin = UserRef {
            id: 3,
            username: "root".to_string(),
            is_superuser: true,
        };

        // Non-superuser non-owner: neither control.
        assert!(!can_edit_record(&stranger, &owner));
        assert!(!can_delete_record(&stranger));

        // Non-superuser owner: edit only.
        assert!(can_edit_record(&owner, &owner));
        assert!(!can_delete_record(&owner));

        // Superuser: both, regardless of ownership.
        assert!(can_edit_record(&admin, &owner));
        assert!(can_delete_record(&admin));
    }
}
