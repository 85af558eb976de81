//! Gap skipping: find the next slot that has something going on.
//!
//! Schedules have breaks. Asking about a gap should show what comes next, so
//! the advancer snaps forward on the same half-hour grid the navigation
//! buttons use until it finds running events.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ScheduleError;
use crate::event::EventRecord;
use crate::resolver::current_events;
use crate::schedule::Schedule;
use crate::slot::{ConferenceWindow, SlotTime};

/// Default grid size in minutes.
pub const DEFAULT_SLOT_MINUTES: u16 = 30;

/// Outcome of [`SlotAdvancer::next_nonempty`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSlot<'a> {
    /// The time the events were found at (after clamping and snapping).
    pub time: SlotTime,
    pub events: Vec<&'a EventRecord>,
    /// Whether the requested time was empty and the advancer moved forward.
    pub advanced: bool,
}

/// Finds the next non-empty slot within a conference window.
#[derive(Debug, Clone)]
pub struct SlotAdvancer {
    ceiling: SlotTime,
    slot_minutes: u16,
    max_steps: usize,
}

impl SlotAdvancer {
    /// Create an advancer for `window` using the default 30 minute grid.
    pub fn new(window: &ConferenceWindow) -> Self {
        Self {
            ceiling: window.ceiling,
            slot_minutes: DEFAULT_SLOT_MINUTES,
            max_steps: window.slots_until_ceiling(DEFAULT_SLOT_MINUTES),
        }
    }

    /// Set the grid size. Also rescales the step cap to cover the same span.
    pub fn with_slot_minutes(mut self, slot_minutes: u16) -> Self {
        let slot_minutes = slot_minutes.max(1);
        let span = self.max_steps.saturating_mul(usize::from(self.slot_minutes));
        self.max_steps = span / usize::from(slot_minutes) + 1;
        self.slot_minutes = slot_minutes;
        self
    }

    /// Cap the number of grid steps taken before giving up.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Events at `at`, or at the first later grid slot that has any.
    ///
    /// `at` is clamped to the window ceiling first. If nothing runs there,
    /// the time is rounded up to the next grid line and then moved one slot
    /// at a time.
    ///
    /// # Errors
    /// Returns [`ScheduleError::EmptySchedule`] when the search passes the
    /// ceiling or exceeds the step cap without finding an event.
    pub fn next_nonempty<'a>(
        &self,
        schedule: &'a Schedule,
        at: SlotTime,
    ) -> Result<ResolvedSlot<'a>, ScheduleError> {
        let start = at.min(self.ceiling);

        let events = current_events(schedule, start);
        if !events.is_empty() {
            return Ok(ResolvedSlot {
                time: start,
                events,
                advanced: false,
            });
        }

        if schedule.is_empty() {
            warn!(from = %start, "no events loaded");
            return Err(ScheduleError::EmptySchedule {
                from: start,
                steps: 0,
            });
        }

        let mut time = start.ceil_to_slot(self.slot_minutes);
        let mut steps = 1;
        loop {
            if time > self.ceiling || steps > self.max_steps {
                warn!(from = %start, reached = %time, steps, "no occupied slot before ceiling");
                return Err(ScheduleError::EmptySchedule { from: start, steps });
            }

            let events = current_events(schedule, time);
            debug!(at = %time, steps, found = events.len(), "slot probed");
            if !events.is_empty() {
                return Ok(ResolvedSlot {
                    time,
                    events,
                    advanced: true,
                });
            }

            time = time.add_minutes(i64::from(self.slot_minutes));
            steps += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> ConferenceWindow {
        ConferenceWindow {
            year: 2019,
            month: 5,
            first_day: 2,
            days: 4,
            workshop_days: 1,
            ceiling: SlotTime::new(5, 18, 0).unwrap(),
        }
    }

    fn schedule() -> Schedule {
        Schedule::from_events(vec![
            EventRecord::new(2, 720, 60, "Morning"),
            EventRecord::new(2, 840, 45, "Afternoon"),
            EventRecord::new(3, 540, 30, "Next day"),
            EventRecord::new(5, 1020, 60, "Closing"),
        ])
    }

    #[test]
    fn returns_immediately_when_occupied() {
        let schedule = schedule();
        let at = SlotTime { day: 2, minute: 730 };
        let slot = SlotAdvancer::new(&window()).next_nonempty(&schedule, at).unwrap();
        assert_eq!(slot.time, at);
        assert!(!slot.advanced);
        assert_eq!(slot.events[0].name(), "Morning");
    }

    #[test]
    fn skips_gap_on_half_hour_grid() {
        let schedule = schedule();
        let slot = SlotAdvancer::new(&window())
            .next_nonempty(&schedule, SlotTime { day: 2, minute: 790 })
            .unwrap();
        assert_eq!(slot.time, SlotTime { day: 2, minute: 840 });
        assert!(slot.advanced);
        assert_eq!(slot.events[0].name(), "Afternoon");
    }

    #[test]
    fn rolls_over_into_next_day() {
        let schedule = schedule();
        let slot = SlotAdvancer::new(&window())
            .next_nonempty(&schedule, SlotTime { day: 2, minute: 1000 })
            .unwrap();
        assert_eq!(slot.time, SlotTime { day: 3, minute: 540 });
    }

    #[test]
    fn clamps_past_ceiling() {
        let schedule = schedule();
        let slot = SlotAdvancer::new(&window())
            .next_nonempty(&schedule, SlotTime { day: 9, minute: 600 })
            .unwrap();
        assert_eq!(slot.time, SlotTime::new(5, 18, 0).unwrap());
        assert_eq!(slot.events[0].name(), "Closing");
    }

    #[test]
    fn empty_schedule_fails_instead_of_looping() {
        let schedule = Schedule::default();
        let err = SlotAdvancer::new(&window())
            .next_nonempty(&schedule, SlotTime { day: 2, minute: 600 })
            .unwrap_err();
        assert!(matches!(err, ScheduleError::EmptySchedule { steps: 0, .. }));
    }

    #[test]
    fn nothing_left_before_ceiling_fails() {
        let schedule = Schedule::from_events(vec![EventRecord::new(2, 600, 30, "Only")]);
        let err = SlotAdvancer::new(&window())
            .next_nonempty(&schedule, SlotTime { day: 3, minute: 600 })
            .unwrap_err();
        assert!(matches!(err, ScheduleError::EmptySchedule { .. }));
    }

    #[test]
    fn step_cap_is_enforced() {
        let schedule = schedule();
        let err = SlotAdvancer::new(&window())
            .with_max_steps(2)
            .next_nonempty(&schedule, SlotTime { day: 2, minute: 1000 })
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::EmptySchedule {
                from: SlotTime { day: 2, minute: 1000 },
                steps: 3
            }
        );
    }

    #[test]
    fn custom_grid() {
        let schedule = schedule();
        let slot = SlotAdvancer::new(&window())
            .with_slot_minutes(15)
            .next_nonempty(&schedule, SlotTime { day: 2, minute: 790 })
            .unwrap();
        assert_eq!(slot.time, SlotTime { day: 2, minute: 840 });
    }
}
