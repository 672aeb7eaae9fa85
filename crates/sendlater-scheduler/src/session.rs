//! Ephemeral pagination session over one owner's scheduled messages.

use std::time::{Duration, Instant};

use sendlater_store::ScheduledRecord;

use crate::{Scheduler, SessionError};

/// Default inactivity timeout, matching the interactive surface's
/// one-hour button collector.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Cursor over a snapshot of one owner's scheduled messages.
///
/// The snapshot is taken once at creation and can drift from the store
/// if the same owner deletes through a concurrent session; that window
/// is accepted. Deletes go through [`Scheduler::delete_by_id`], whose
/// id+owner check turns a stale delete into a harmless no-op.
pub struct PageSession {
    owner_id: String,
    records: Vec<ScheduledRecord>,
    index: usize,
    timeout: Duration,
    last_action: Instant,
}

impl PageSession {
    /// Create a session over a [`Scheduler::list_by_owner`] snapshot.
    pub fn new(owner_id: impl Into<String>, records: Vec<ScheduledRecord>) -> Self {
        Self::with_timeout(owner_id, records, DEFAULT_TIMEOUT)
    }

    /// Create a session with a custom inactivity timeout.
    pub fn with_timeout(
        owner_id: impl Into<String>,
        records: Vec<ScheduledRecord>,
        timeout: Duration,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            records,
            index: 0,
            timeout,
            last_action: Instant::now(),
        }
    }

    /// Whether the session is still accepting actions.
    pub fn is_live(&self) -> bool {
        self.last_action.elapsed() < self.timeout
    }

    /// Number of records in the local view.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 0-based cursor position, `None` for an empty view.
    pub fn current_index(&self) -> Option<usize> {
        (!self.records.is_empty()).then_some(self.index)
    }

    /// The record under the cursor.
    pub fn current(&self) -> Option<&ScheduledRecord> {
        self.records.get(self.index)
    }

    /// Move the cursor forward one record; stays put at the end.
    pub fn next(&mut self) -> Result<Option<&ScheduledRecord>, SessionError> {
        self.touch()?;
        if self.index + 1 < self.records.len() {
            self.index += 1;
        }
        Ok(self.current())
    }

    /// Move the cursor back one record; stays put at the start.
    pub fn previous(&mut self) -> Result<Option<&ScheduledRecord>, SessionError> {
        self.touch()?;
        if self.index > 0 {
            self.index -= 1;
        }
        Ok(self.current())
    }

    /// Delete the record under the cursor from the store and the local
    /// snapshot, then clamp the cursor. Returns the deleted record.
    pub async fn delete(
        &mut self,
        scheduler: &Scheduler,
    ) -> Result<ScheduledRecord, SessionError> {
        self.touch()?;
        if self.records.is_empty() {
            return Err(SessionError::Empty);
        }

        let record = self.records[self.index].clone();
        scheduler.delete_by_id(&record.id, &self.owner_id).await?;

        self.records.remove(self.index);
        if self.index > 0 {
            self.index -= 1;
        }
        Ok(record)
    }

    /// Message editing is not implemented; the action is acknowledged
    /// without any state change.
    pub fn edit(&mut self) -> Result<(), SessionError> {
        self.touch()?;
        Ok(())
    }

    fn touch(&mut self) -> Result<(), SessionError> {
        if !self.is_live() {
            return Err(SessionError::Expired);
        }
        self.last_action = Instant::now();
        Ok(())
    }
}
