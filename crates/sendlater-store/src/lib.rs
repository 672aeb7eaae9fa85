//! Durable storage for the sendlater queue.
//!
//! A single JSON document holds the ordered list of pending scheduled
//! records. The document is always sorted ascending by due time, and
//! writes are atomic (write-to-temp-then-rename), so readers see either
//! the old or the new queue, never a partial write.

mod error;
mod store;
mod types;

pub use error::StoreError;
pub use store::JsonStore;
pub use types::{Destination, QueueDocument, ScheduledRecord};
