//! Schedule store.
//!
//! A [`Schedule`] is the normalized, sorted list of events. It has no
//! mutation API: reloading builds a new `Schedule` and swaps it into a
//! [`SharedSchedule`] handle, so readers holding the previous snapshot are
//! unaffected.

mod snapshot;

pub use snapshot::{load_snapshot, read_raw_events, save_snapshot};

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::ValidationError;
use crate::event::{EventRecord, Normalizer, RawEvent};

/// Immutable, sorted collection of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    events: Vec<EventRecord>,
}

impl Schedule {
    /// Normalize raw records and sort them by `(day, start minute)`.
    ///
    /// Relative links are rejected; use [`Schedule::load_with`] to resolve
    /// them against a site base URL.
    ///
    /// # Errors
    /// The first invalid record aborts the whole load.
    pub fn load(raw_events: &[RawEvent]) -> Result<Self, ValidationError> {
        Self::load_with(&Normalizer::new(), raw_events)
    }

    /// Same as [`Schedule::load`] with a custom [`Normalizer`].
    ///
    /// # Errors
    /// The first invalid record aborts the whole load.
    pub fn load_with(
        normalizer: &Normalizer,
        raw_events: &[RawEvent],
    ) -> Result<Self, ValidationError> {
        let events = raw_events
            .iter()
            .enumerate()
            .map(|(index, raw)| normalizer.normalize(index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        let schedule = Self::from_events(events);
        info!(
            events = schedule.len(),
            days = ?schedule.days(),
            "schedule loaded"
        );
        Ok(schedule)
    }

    /// Build from already-typed events. Sorting is stable, so events sharing
    /// a start keep their input order.
    pub fn from_events(mut events: Vec<EventRecord>) -> Self {
        events.sort_by_key(EventRecord::sort_key);
        Self { events }
    }

    /// All events in canonical order.
    pub fn all(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct days present in the schedule, ascending.
    pub fn days(&self) -> Vec<u32> {
        let mut days: Vec<u32> = self.events.iter().map(EventRecord::day).collect();
        days.dedup();
        days
    }

    pub fn events_on(&self, day: u32) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(move |e| e.day() == day)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Process-wide handle to the current schedule snapshot.
///
/// Readers take an `Arc` and never block each other for longer than the
/// pointer clone; [`SharedSchedule::replace`] swaps the whole snapshot.
#[derive(Debug, Default)]
pub struct SharedSchedule {
    current: RwLock<Arc<Schedule>>,
}

impl SharedSchedule {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            current: RwLock::new(Arc::new(schedule)),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<Schedule> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new snapshot, returning the previous one.
    pub fn replace(&self, schedule: Schedule) -> Arc<Schedule> {
        let next = Arc::new(schedule);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawNumber;

    fn raw(day: i64, time: &str, name: &str) -> RawEvent {
        RawEvent {
            day: Some(RawNumber::Int(day)),
            time: Some(time.into()),
            duration: Some(RawNumber::Int(30)),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn load_sorts_by_day_then_minutes() {
        let schedule = Schedule::load(&[
            raw(3, "0900", "c"),
            raw(2, "1400", "b"),
            raw(2, "930", "a"),
        ])
        .unwrap();
        let names: Vec<_> = schedule.iter().map(EventRecord::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(schedule.days(), vec![2, 3]);
    }

    #[test]
    fn one_bad_record_fails_the_load() {
        let mut broken = raw(2, "1000", "x");
        broken.name = None;
        let err = Schedule::load(&[raw(2, "0900", "ok"), broken]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                index: 1,
                field: "name"
            }
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let schedule =
            Schedule::load(&[raw(2, "1000", "first"), raw(2, "1000", "second")]).unwrap();
        assert_eq!(schedule.all()[0].name(), "first");
        assert_eq!(schedule.all()[1].name(), "second");
    }

    #[test]
    fn shared_schedule_swaps_whole_snapshot() {
        let shared = SharedSchedule::new(Schedule::load(&[raw(2, "0900", "old")]).unwrap());
        let before = shared.snapshot();

        let previous = shared.replace(Schedule::load(&[raw(2, "0900", "new")]).unwrap());

        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.all()[0].name(), "old");
        assert_eq!(shared.snapshot().all()[0].name(), "new");
    }

    #[test]
    fn events_on_filters_by_day() {
        let schedule = Schedule::load(&[raw(2, "0900", "a"), raw(3, "0900", "b")]).unwrap();
        let names: Vec<_> = schedule.events_on(3).map(EventRecord::name).collect();
        assert_eq!(names, ["b"]);
    }
}
