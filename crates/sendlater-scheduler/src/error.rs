//! Error types for the scheduling engine.

use thiserror::Error;

use sendlater_store::StoreError;

/// Rejection reasons for [`crate::Scheduler::schedule`].
///
/// Reported synchronously to the caller; validation never mutates the
/// store and is never logged server-side. Checks run in a fixed
/// precedence order and the first failure wins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The date/time components do not form a real calendar instant.
    #[error("date and time do not form a valid calendar instant")]
    InvalidDateTime,

    /// The resolved instant is not strictly in the future.
    #[error("scheduled time must be strictly in the future")]
    PastDueTime,

    /// The message body exceeds the character limit.
    #[error("message body exceeds {} characters", crate::MAX_BODY_CHARS)]
    BodyTooLong,

    /// Too many attachment links.
    #[error("at most {} attachment links are allowed", crate::MAX_ATTACHMENTS)]
    TooManyAttachments,

    /// An attachment link is not a well-formed absolute URL.
    #[error("attachment is not a well-formed absolute URL: {0}")]
    MalformedUrl(String),

    /// No destination channel to deliver to.
    #[error("no destination channel to deliver to")]
    NoDestination,
}

/// Errors from record lifecycle operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The schedule request was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The durable store could not be read or written. Write failures
    /// abort the operation; a new record is discarded, never reported
    /// as scheduled.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from pagination session actions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session passed its inactivity timeout.
    #[error("session expired")]
    Expired,

    /// The action needs a current record but the view is empty.
    #[error("no scheduled messages in view")]
    Empty,

    /// A session-driven store operation failed.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
