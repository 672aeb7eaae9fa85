//! Scheduling time specification.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::ValidationError;

/// When a scheduled record should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueTime {
    /// Calendar components in UTC.
    ///
    /// When `year` is omitted, the earliest future occurrence of the
    /// given month/day/time is chosen (this year if still ahead,
    /// otherwise next year).
    Calendar {
        year: Option<i32>,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },
    /// An already-resolved Unix timestamp in seconds.
    Epoch(i64),
}

impl DueTime {
    /// Resolve to an epoch-second timestamp.
    ///
    /// Calendar components are validated strictly: hour 0-23, minute
    /// 0-59, and the date must exist on the calendar (April 31 is
    /// rejected, never normalized to May 1). The resolved instant must
    /// be strictly after `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<i64, ValidationError> {
        let due_at = match *self {
            DueTime::Epoch(secs) => secs,
            DueTime::Calendar {
                year,
                month,
                day,
                hour,
                minute,
            } => {
                if hour > 23 || minute > 59 {
                    return Err(ValidationError::InvalidDateTime);
                }
                match year {
                    Some(year) => calendar_timestamp(year, month, day, hour, minute)?,
                    None => {
                        let this_year =
                            calendar_timestamp(now.year(), month, day, hour, minute)?;
                        if this_year > now.timestamp() {
                            this_year
                        } else {
                            calendar_timestamp(now.year() + 1, month, day, hour, minute)?
                        }
                    }
                }
            }
        };

        if due_at <= now.timestamp() {
            return Err(ValidationError::PastDueTime);
        }
        Ok(due_at)
    }
}

/// Build a UTC timestamp from calendar components, rejecting dates that
/// do not exist (e.g. day 31 of a 30-day month).
fn calendar_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Result<i64, ValidationError> {
    let date =
        NaiveDate::from_ymd_opt(year, month, day).ok_or(ValidationError::InvalidDateTime)?;
    let instant = date
        .and_hms_opt(hour, minute, 0)
        .ok_or(ValidationError::InvalidDateTime)?;
    Ok(instant.and_utc().timestamp())
}
