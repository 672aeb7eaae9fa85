//! Persisted queue types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery target for a scheduled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Server the channel belongs to.
    pub guild_id: String,
    /// Channel the message is delivered to.
    pub channel_id: String,
}

/// A message scheduled for future delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledRecord {
    /// Opaque unique handle, assigned at creation.
    pub id: String,
    /// User who created the record; scopes listing and deletion.
    pub owner_id: String,
    /// Channel the message will be delivered to.
    pub destination: Destination,
    /// Message text, bounded at creation time.
    pub body: String,
    /// Unix epoch seconds at/after which this record becomes deliverable.
    pub due_at: i64,
    /// Attachment links, each a validated absolute URL.
    pub attachments: Vec<String>,
    /// If false, delivery appends an attribution notice for `owner_id`.
    pub anonymous: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// The durable queue document.
///
/// `reminders` is kept sorted ascending by `due_at`; records with equal
/// due times keep insertion order. The dispatch sweep relies on this to
/// treat the due records as a contiguous prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDocument {
    pub reminders: Vec<ScheduledRecord>,
}

impl QueueDocument {
    /// Insert `record` at the first position whose due time exceeds the
    /// record's, preserving the sort invariant and insertion order among
    /// equal due times.
    pub fn insert_sorted(&mut self, record: ScheduledRecord) {
        let index = self
            .reminders
            .partition_point(|r| r.due_at <= record.due_at);
        self.reminders.insert(index, record);
    }

    /// Remove and return the maximal prefix of records with
    /// `due_at <= now`, leaving the remainder untouched in relative order.
    pub fn split_due(&mut self, now: i64) -> Vec<ScheduledRecord> {
        let end = self.reminders.partition_point(|r| r.due_at <= now);
        self.reminders.drain(..end).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: &str, due_at: i64) -> ScheduledRecord {
        ScheduledRecord {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            destination: Destination {
                guild_id: "guild".to_string(),
                channel_id: "channel".to_string(),
            },
            body: format!("message {id}"),
            due_at,
            attachments: Vec::new(),
            anonymous: false,
            created_at: Utc::now(),
        }
    }

    fn is_sorted(queue: &QueueDocument) -> bool {
        queue
            .reminders
            .windows(2)
            .all(|pair| pair[0].due_at <= pair[1].due_at)
    }

    #[test]
    fn test_equal_due_times_keep_insertion_order() {
        let mut queue = QueueDocument::default();
        queue.insert_sorted(record("a", 100));
        queue.insert_sorted(record("b", 50));
        queue.insert_sorted(record("c", 50));

        let ids: Vec<&str> = queue.reminders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_split_due_takes_prefix_only() {
        let mut queue = QueueDocument::default();
        queue.insert_sorted(record("a", 100));
        queue.insert_sorted(record("b", 50));
        queue.insert_sorted(record("c", 50));

        let due = queue.split_due(60);
        let due_ids: Vec<&str> = due.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(due_ids, vec!["b", "c"]);

        let remaining: Vec<&str> = queue.reminders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(remaining, vec!["a"]);
    }

    #[test]
    fn test_split_due_on_empty_queue() {
        let mut queue = QueueDocument::default();
        assert!(queue.split_due(1_000_000).is_empty());
        assert!(queue.reminders.is_empty());
    }

    #[test]
    fn test_document_field_name_is_reminders() {
        let mut queue = QueueDocument::default();
        queue.insert_sorted(record("a", 100));

        let json = serde_json::to_value(&queue).unwrap();
        assert!(json.get("reminders").is_some());
    }

    proptest! {
        // Insertion preserves the sort invariant for any due times.
        #[test]
        fn insert_keeps_queue_sorted(
            dues in proptest::collection::vec(0i64..1_000, 0..50),
            new_due in 0i64..1_000,
        ) {
            let mut queue = QueueDocument::default();
            for (i, due) in dues.iter().enumerate() {
                queue.insert_sorted(record(&i.to_string(), *due));
            }
            prop_assert!(is_sorted(&queue));

            queue.insert_sorted(record("new", new_due));
            prop_assert!(is_sorted(&queue));
        }

        // split_due extracts exactly the maximal due prefix, and
        // prefix + remainder is a partition of the original queue.
        #[test]
        fn split_due_is_maximal_prefix(
            dues in proptest::collection::vec(0i64..1_000, 0..50),
            cut in 0i64..1_000,
        ) {
            let mut queue = QueueDocument::default();
            for (i, due) in dues.iter().enumerate() {
                queue.insert_sorted(record(&i.to_string(), *due));
            }
            let original = queue.clone();

            let due = queue.split_due(cut);

            prop_assert!(due.iter().all(|r| r.due_at <= cut));
            prop_assert!(queue.reminders.iter().all(|r| r.due_at > cut));
            prop_assert!(is_sorted(&queue));

            let mut recombined = due;
            recombined.extend(queue.reminders.iter().cloned());
            prop_assert_eq!(recombined, original.reminders);
        }
    }
}
