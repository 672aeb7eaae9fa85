//! Delivery adapter contract and message formatting helpers.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use thiserror::Error;

use sendlater_store::{Destination, ScheduledRecord};

/// Failure to deliver a single record.
///
/// Caught and logged by the dispatch sweep; never surfaced to users,
/// never retried.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The destination channel could not be resolved to a sendable
    /// target.
    #[error("unknown destination channel {0}")]
    UnknownDestination(String),

    /// The transport rejected or dropped the send.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Sends one scheduled record to its destination channel.
///
/// Supplied by the surrounding platform adapter. An implementation
/// resolves [`ScheduledRecord::destination`], sends the body plus
/// attachment links, and, when the record is not anonymous, includes
/// the [`attribution_notice`] for the owner. Errors are reported
/// through the `Result`; implementations must not panic, since the
/// sweep performs no per-record recovery beyond logging.
#[async_trait]
pub trait DeliveryAdapter: Send + Sync {
    async fn deliver(&self, record: &ScheduledRecord) -> Result<(), DeliveryError>;
}

/// Attribution line for non-anonymous records, `None` otherwise.
pub fn attribution_notice(record: &ScheduledRecord) -> Option<String> {
    (!record.anonymous).then(|| {
        format!(
            "This message was scheduled by <@{}>.",
            record.owner_id
        )
    })
}

/// Canonical link to a destination channel.
pub fn channel_link(destination: &Destination) -> String {
    format!(
        "https://discord.com/channels/{}/{}",
        destination.guild_id, destination.channel_id
    )
}

/// Human-readable summary of a scheduled record, used by the paging UI.
pub fn describe(record: &ScheduledRecord) -> String {
    let due = match Utc.timestamp_opt(record.due_at, 0).single() {
        Some(instant) => instant.format("%a %b %-d %Y at %H:%M UTC").to_string(),
        None => record.due_at.to_string(),
    };
    format!(
        "**Date:** {due}\n**Channel:** {}\n**Anonymous:** {}\n\n**Message:**\n{}",
        channel_link(&record.destination),
        record.anonymous,
        record.body,
    )
}
