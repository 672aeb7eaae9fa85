//! Record lifecycle API over the durable queue store.

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use sendlater_store::{Destination, JsonStore, ScheduledRecord};

use crate::{DueTime, SchedulerError, ValidationError};

/// Maximum message body length in characters.
pub const MAX_BODY_CHARS: usize = 1800;

/// Maximum number of attachment links per record.
pub const MAX_ATTACHMENTS: usize = 10;

/// A request to schedule a message for future delivery.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// User scheduling the message.
    pub owner_id: String,
    /// Delivery target; `None` when the command was invoked without a
    /// usable channel context.
    pub destination: Option<Destination>,
    /// Message text.
    pub body: String,
    /// When to deliver.
    pub when: DueTime,
    /// Attachment links.
    pub attachments: Vec<String>,
    /// Suppress the attribution notice on delivery.
    pub anonymous: bool,
}

/// The record lifecycle API.
///
/// Every operation is one load-mutate-commit cycle against the store,
/// serialized behind an internal mutex: the store itself provides no
/// locking, and two concurrent commits from stale snapshots would
/// silently drop records.
pub struct Scheduler {
    store: JsonStore,
    commit_lock: Mutex<()>,
}

impl Scheduler {
    /// Create a scheduler over `store`.
    pub fn new(store: JsonStore) -> Self {
        Self {
            store,
            commit_lock: Mutex::new(()),
        }
    }

    /// Validate and persist a new scheduled record.
    ///
    /// Checks run in a fixed precedence order, first failure wins:
    /// calendar validity, strictly-future time, body length, attachment
    /// count, URL well-formedness, then destination presence. On
    /// success the record is inserted preserving the queue's due-time
    /// order and committed; a commit failure discards the record.
    #[tracing::instrument(skip(self, request), fields(owner = %request.owner_id))]
    pub async fn schedule(
        &self,
        request: ScheduleRequest,
    ) -> Result<ScheduledRecord, SchedulerError> {
        let now = Utc::now();
        let due_at = request.when.resolve(now)?;

        if request.body.chars().count() > MAX_BODY_CHARS {
            return Err(ValidationError::BodyTooLong.into());
        }
        if request.attachments.len() > MAX_ATTACHMENTS {
            return Err(ValidationError::TooManyAttachments.into());
        }
        for link in &request.attachments {
            if Url::parse(link).is_err() {
                return Err(ValidationError::MalformedUrl(link.clone()).into());
            }
        }
        let destination = request
            .destination
            .ok_or(ValidationError::NoDestination)?;

        let record = ScheduledRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: request.owner_id,
            destination,
            body: request.body,
            due_at,
            attachments: request.attachments,
            anonymous: request.anonymous,
            created_at: now,
        };

        let _guard = self.commit_lock.lock().await;
        let mut queue = self.store.load().await?;
        queue.insert_sorted(record.clone());
        self.store.commit(&queue).await?;

        info!(id = %record.id, due_at = record.due_at, "scheduled message");
        Ok(record)
    }

    /// All pending records belonging to `owner_id`, in global due-time
    /// order. Stateless: each call takes a fresh snapshot.
    pub async fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<ScheduledRecord>, SchedulerError> {
        let _guard = self.commit_lock.lock().await;
        let queue = self.store.load().await?;
        Ok(queue
            .reminders
            .into_iter()
            .filter(|r| r.owner_id == owner_id)
            .collect())
    }

    /// Delete the record matching both `id` and `owner_id`.
    ///
    /// No matching record is a no-op, not an error. The ownership check
    /// means a caller can never delete another user's record, even with
    /// a leaked id.
    pub async fn delete_by_id(&self, id: &str, owner_id: &str) -> Result<(), SchedulerError> {
        let _guard = self.commit_lock.lock().await;
        let mut queue = self.store.load().await?;
        let before = queue.reminders.len();
        queue
            .reminders
            .retain(|r| !(r.id == id && r.owner_id == owner_id));

        if queue.reminders.len() == before {
            debug!(id, "delete: no matching record");
            return Ok(());
        }

        self.store.commit(&queue).await?;
        info!(id, "deleted scheduled message");
        Ok(())
    }

    /// Remove and return every record with `due_at <= now` (epoch
    /// seconds), in original order.
    ///
    /// Relies on the queue's sort invariant: the due records form a
    /// contiguous prefix. Used by the dispatch sweep.
    pub async fn extract_due(&self, now: i64) -> Result<Vec<ScheduledRecord>, SchedulerError> {
        let _guard = self.commit_lock.lock().await;
        let mut queue = self.store.load().await?;
        let due = queue.split_due(now);
        self.store.commit(&queue).await?;
        Ok(due)
    }
}
