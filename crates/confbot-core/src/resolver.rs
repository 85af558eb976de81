//! Time-window resolution: which events are running at a given moment.

use crate::event::EventRecord;
use crate::schedule::Schedule;
use crate::slot::SlotTime;

/// Events running at `at`, longest first.
///
/// An event is running when it is on `at.day` and `at.minute` lies in
/// `[start, start + duration]`; the end minute itself still counts. Events
/// of equal length keep schedule order.
pub fn current_events(schedule: &Schedule, at: SlotTime) -> Vec<&EventRecord> {
    let mut events: Vec<&EventRecord> = schedule.iter().filter(|e| e.is_running_at(at)).collect();
    events.sort_by(|a, b| b.duration_minutes().cmp(&a.duration_minutes()));
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Schedule {
        Schedule::from_events(vec![
            EventRecord::new(2, 900, 60, "Keynote"),
            EventRecord::new(2, 930, 45, "Short talk"),
            EventRecord::new(2, 930, 90, "Workshop"),
            EventRecord::new(2, 930, 45, "Other short talk"),
            EventRecord::new(3, 900, 60, "Tomorrow"),
        ])
    }

    fn names(events: &[&EventRecord]) -> Vec<String> {
        events.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn boundaries_are_inclusive() {
        let schedule = Schedule::from_events(vec![EventRecord::new(2, 900, 60, "Keynote")]);
        let at = |minute| SlotTime { day: 2, minute };

        assert!(current_events(&schedule, at(899)).is_empty());
        assert_eq!(current_events(&schedule, at(900)).len(), 1);
        assert_eq!(current_events(&schedule, at(960)).len(), 1);
        assert!(current_events(&schedule, at(961)).is_empty());
    }

    #[test]
    fn longest_first_with_stable_ties() {
        let sched = schedule();
        let events = current_events(&sched, SlotTime { day: 2, minute: 950 });
        assert_eq!(
            names(&events),
            ["Workshop", "Keynote", "Short talk", "Other short talk"]
        );
    }

    #[test]
    fn other_days_are_ignored() {
        let sched = schedule();
        let events = current_events(&sched, SlotTime { day: 3, minute: 950 });
        assert_eq!(names(&events), ["Tomorrow"]);
    }

    #[test]
    fn zero_length_event_is_current_only_at_its_start() {
        let schedule = Schedule::from_events(vec![EventRecord::new(2, 1080, 0, "Closing")]);
        assert_eq!(current_events(&schedule, SlotTime { day: 2, minute: 1080 }).len(), 1);
        assert!(current_events(&schedule, SlotTime { day: 2, minute: 1081 }).is_empty());
    }
}
