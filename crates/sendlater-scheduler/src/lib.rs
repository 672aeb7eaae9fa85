//! Scheduled-message delivery engine for sendlater.
//!
//! This crate provides:
//! - Validation and creation of scheduled records
//! - The record lifecycle API over the durable queue store
//! - A per-minute dispatch sweep with at-most-once delivery
//! - An ephemeral pagination session for interactive listing/deletion
//!
//! Chat-command parsing, embeds/buttons, and platform registration live
//! outside this crate; they call in through [`Scheduler`],
//! [`PageSession`], and the [`DeliveryAdapter`] seam.

mod delivery;
mod error;
mod scheduler;
mod session;
mod sweep;
mod types;

pub use delivery::{DeliveryAdapter, DeliveryError, attribution_notice, channel_link, describe};
pub use error::{SchedulerError, SessionError, ValidationError};
pub use scheduler::{MAX_ATTACHMENTS, MAX_BODY_CHARS, ScheduleRequest, Scheduler};
pub use session::PageSession;
pub use sweep::Sweep;
pub use types::DueTime;
