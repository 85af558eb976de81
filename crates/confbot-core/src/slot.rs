//! Points in conference time and the conference window.
//!
//! A [`SlotTime`] is a `(day, minute-of-day)` pair. Days use the same
//! numbering as the scraped schedule (the day of the month for a single-month
//! conference), so no calendar arithmetic is needed on the hot path.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A point in conference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotTime {
    pub day: u32,
    /// Minutes since midnight, `0..1440`.
    pub minute: u16,
}

impl SlotTime {
    /// Day 0, 00:00: before any conference event.
    pub const ORIGIN: SlotTime = SlotTime { day: 0, minute: 0 };

    /// Build a slot from a day and a wall-clock hour/minute.
    ///
    /// # Errors
    /// Returns [`NavigationError::OutOfRange`] if `hour >= 24` or `minute >= 60`.
    pub fn new(day: u32, hour: u32, minute: u32) -> Result<Self, NavigationError> {
        if hour >= 24 {
            return Err(NavigationError::OutOfRange {
                field: "hour",
                value: hour,
            });
        }
        if minute >= 60 {
            return Err(NavigationError::OutOfRange {
                field: "minute",
                value: minute,
            });
        }
        Ok(Self {
            day,
            minute: (hour * 60 + minute) as u16,
        })
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minute / 60)
    }

    pub fn minute_of_hour(&self) -> u32 {
        u32::from(self.minute % 60)
    }

    /// Shift by `delta` minutes, rolling the day over in either direction.
    ///
    /// Saturates at day 0, 00:00.
    pub fn add_minutes(&self, delta: i64) -> Self {
        let per_day = i64::from(MINUTES_PER_DAY);
        let total = (i64::from(self.day) * per_day + i64::from(self.minute) + delta).max(0);
        Self {
            day: (total / per_day) as u32,
            minute: (total % per_day) as u16,
        }
    }

    /// Move forward to the next grid line of a `slot_minutes` grid.
    ///
    /// A time already on the grid still advances by one full slot.
    pub fn ceil_to_slot(&self, slot_minutes: u16) -> Self {
        let slot = slot_minutes.max(1);
        self.add_minutes(i64::from(slot - self.minute % slot))
    }

    fn total_minutes(&self) -> i64 {
        i64::from(self.day) * i64::from(MINUTES_PER_DAY) + i64::from(self.minute)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} {:02}:{:02}",
            self.day,
            self.hour(),
            self.minute_of_hour()
        )
    }
}

/// The bounded multi-day span during which events may occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceWindow {
    pub year: i32,
    pub month: u32,
    /// Day number of the first conference day.
    pub first_day: u32,
    /// Number of conference days, including workshop days.
    pub days: u32,
    /// Leading days without talks.
    pub workshop_days: u32,
    /// Last moment anyone can ask about; later times are clamped to it.
    pub ceiling: SlotTime,
}

impl ConferenceWindow {
    pub fn last_day(&self) -> u32 {
        self.first_day + self.days.saturating_sub(1)
    }

    /// Days that get a navigation button (workshop days are skipped).
    pub fn talk_days(&self) -> std::ops::RangeInclusive<u32> {
        (self.first_day + self.workshop_days)..=self.last_day()
    }

    pub fn contains_day(&self, day: u32) -> bool {
        (self.first_day..=self.last_day()).contains(&day)
    }

    pub fn clamp(&self, at: SlotTime) -> SlotTime {
        at.min(self.ceiling)
    }

    /// Map a wall-clock time into conference time for slot browsing.
    ///
    /// Inside the conference month the day of the month is the day number.
    /// Earlier dates map to the very start (everything is upcoming), later
    /// dates map to the ceiling.
    pub fn slot_at(&self, at: NaiveDateTime) -> SlotTime {
        match self.in_month(at) {
            Ok(slot) => slot,
            Err(std::cmp::Ordering::Greater) => self.ceiling,
            Err(_) => SlotTime::ORIGIN,
        }
    }

    /// Map a wall-clock time into a search reference time.
    ///
    /// Any date outside the conference month is before every event, so a
    /// search run then lists the whole schedule.
    pub fn search_reference_at(&self, at: NaiveDateTime) -> SlotTime {
        self.in_month(at).unwrap_or(SlotTime::ORIGIN)
    }

    /// The slot for `at` if it falls in the conference month, otherwise how
    /// its month compares to the conference month.
    fn in_month(&self, at: NaiveDateTime) -> Result<SlotTime, std::cmp::Ordering> {
        let date = at.date();
        match (date.year(), date.month()).cmp(&(self.year, self.month)) {
            std::cmp::Ordering::Equal => Ok(SlotTime {
                day: date.day(),
                minute: (at.hour() * 60 + at.minute()) as u16,
            }),
            other => Err(other),
        }
    }

    /// Number of `slot_minutes` steps from day 0 to the ceiling.
    ///
    /// Used as the default iteration cap of the slot advancer.
    pub fn slots_until_ceiling(&self, slot_minutes: u16) -> usize {
        let slot = i64::from(slot_minutes.max(1));
        (self.ceiling.total_minutes() / slot) as usize + 1
    }
}
