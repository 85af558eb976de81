//! Free-text search over upcoming events.
//!
//! # Contract
//!
//! Only events that have not ended at the reference time are considered:
//! events on later days, and events on the same day whose end minute is not
//! before the reference minute.
//!
//! A non-empty query yields the upcoming events whose text (every field,
//! case-insensitive) contains the query, in schedule order. If that yields
//! nothing, either because the query is blank or because nothing matched,
//! the search falls back to *all* upcoming events, unfiltered. A query that
//! matches nothing therefore never produces an empty result while events
//! remain; callers that need to tell the two apart can check
//! [`Search::fell_back`] after iterating.

use tracing::debug;

use crate::event::EventRecord;
use crate::schedule::Schedule;
use crate::slot::SlotTime;

/// Default number of results for the inline search surface.
pub const DEFAULT_INLINE_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Filtered,
    Fallback,
    Done,
}

/// Lazy, finite search results.
///
/// Cloning a `Search` (or calling [`Search::restart`]) gives an independent
/// iterator, so results can be walked more than once.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    events: &'a [EventRecord],
    at: SlotTime,
    needle: Option<String>,
    phase: Phase,
    position: usize,
    matched: usize,
    fell_back: bool,
}

impl<'a> Search<'a> {
    fn new(events: &'a [EventRecord], query: &str, at: SlotTime) -> Self {
        let query = query.trim();
        let needle = (!query.is_empty()).then(|| query.to_lowercase());
        let phase = if needle.is_some() {
            Phase::Filtered
        } else {
            Phase::Fallback
        };
        Self {
            events,
            at,
            fell_back: phase == Phase::Fallback,
            needle,
            phase,
            position: 0,
            matched: 0,
        }
    }

    /// A fresh iterator over the same query.
    pub fn restart(&self) -> Self {
        let mut fresh = self.clone();
        fresh.phase = if fresh.needle.is_some() {
            Phase::Filtered
        } else {
            Phase::Fallback
        };
        fresh.fell_back = fresh.phase == Phase::Fallback;
        fresh.position = 0;
        fresh.matched = 0;
        fresh
    }

    /// Whether results come from the unfiltered fallback.
    ///
    /// Only meaningful once the filtered phase has been exhausted; for a blank
    /// query it is `true` from the start.
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }
}

impl<'a> Iterator for Search<'a> {
    type Item = &'a EventRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let events = self.events;
        loop {
            match self.phase {
                Phase::Filtered => {
                    let needle = self.needle.as_deref().unwrap_or_default();
                    while let Some(event) = events.get(self.position) {
                        self.position += 1;
                        if event.is_upcoming_at(self.at) && event.matches_lowercase(needle) {
                            self.matched += 1;
                            return Some(event);
                        }
                    }
                    if self.matched > 0 {
                        self.phase = Phase::Done;
                    } else {
                        debug!(
                            query = needle,
                            at = %self.at,
                            "no matches, falling back to upcoming events"
                        );
                        self.phase = Phase::Fallback;
                        self.fell_back = true;
                        self.position = 0;
                    }
                }
                Phase::Fallback => {
                    while let Some(event) = events.get(self.position) {
                        self.position += 1;
                        if event.is_upcoming_at(self.at) {
                            return Some(event);
                        }
                    }
                    self.phase = Phase::Done;
                }
                Phase::Done => return None,
            }
        }
    }
}

/// Query entry point over one schedule snapshot.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    schedule: &'a Schedule,
}

impl<'a> QueryEngine<'a> {
    pub fn new(schedule: &'a Schedule) -> Self {
        Self { schedule }
    }

    /// Search upcoming events at `at`. See the module docs for the fallback rule.
    pub fn search(&self, query: &str, at: SlotTime) -> Search<'a> {
        Search::new(self.schedule.all(), query, at)
    }

    /// At most `limit` results of [`QueryEngine::search`].
    pub fn search_limited(&self, query: &str, at: SlotTime, limit: usize) -> Vec<&'a EventRecord> {
        self.search(query, at).take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Speaker;

    fn schedule() -> Schedule {
        Schedule::from_events(vec![
            EventRecord::new(2, 540, 60, "Early bird").with_track("Main"),
            EventRecord::new(3, 540, 45, "Rust for Pythonistas")
                .with_speakers(vec![Speaker::new("Ferris", None)]),
            EventRecord::new(3, 600, 30, "Testing with pytest").with_tags(vec!["Testing".into()]),
            EventRecord::new(3, 660, 45, "Async Python"),
            EventRecord::new(4, 540, 45, "More Rust"),
        ])
    }

    fn names<'a>(events: impl IntoIterator<Item = &'a EventRecord>) -> Vec<&'a str> {
        events.into_iter().map(EventRecord::name).collect()
    }

    #[test]
    fn matches_are_case_insensitive_and_ordered() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        let at = SlotTime { day: 3, minute: 500 };
        assert_eq!(
            names(engine.search("  rUsT ", at)),
            ["Rust for Pythonistas", "More Rust"]
        );
    }

    #[test]
    fn ended_events_are_excluded() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        // Rust for Pythonistas ended at 585.
        let at = SlotTime { day: 3, minute: 586 };
        assert_eq!(names(engine.search("rust", at)), ["More Rust"]);

        let at_end = SlotTime { day: 3, minute: 585 };
        assert_eq!(
            names(engine.search("rust", at_end)),
            ["Rust for Pythonistas", "More Rust"]
        );
    }

    #[test]
    fn matches_any_field() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        let at = SlotTime { day: 2, minute: 0 };
        assert_eq!(names(engine.search("ferris", at)), ["Rust for Pythonistas"]);
        assert_eq!(names(engine.search("main", at)), ["Early bird"]);
    }

    #[test]
    fn blank_query_lists_upcoming() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        let at = SlotTime { day: 3, minute: 620 };
        let search = engine.search("   ", at);
        assert!(search.fell_back());
        assert_eq!(
            names(search),
            ["Testing with pytest", "Async Python", "More Rust"]
        );
    }

    #[test]
    fn unmatched_query_falls_back_to_blank_query_results() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        let at = SlotTime { day: 3, minute: 620 };

        let mut search = engine.search("haskell", at);
        let unmatched: Vec<_> = search.by_ref().collect();
        assert!(search.fell_back());
        assert_eq!(unmatched, engine.search("", at).collect::<Vec<_>>());
        assert!(!unmatched.is_empty());
    }

    #[test]
    fn matched_query_does_not_fall_back() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        let mut search = engine.search("pytest", SlotTime { day: 3, minute: 0 });
        assert_eq!(names(search.by_ref()), ["Testing with pytest"]);
        assert!(!search.fell_back());
    }

    #[test]
    fn limit_caps_results() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        let results = engine.search_limited("", SlotTime { day: 2, minute: 0 }, 2);
        assert_eq!(names(results), ["Early bird", "Rust for Pythonistas"]);
    }

    #[test]
    fn search_is_restartable() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        let mut search = engine.search("rust", SlotTime { day: 2, minute: 0 });
        let first: Vec<_> = search.by_ref().collect();
        assert_eq!(search.next(), None);
        let again: Vec<_> = search.restart().collect();
        assert_eq!(first, again);
    }

    #[test]
    fn nothing_upcoming_yields_nothing() {
        let schedule = schedule();
        let engine = QueryEngine::new(&schedule);
        assert_eq!(engine.search("rust", SlotTime { day: 9, minute: 0 }).count(), 0);
    }
}
