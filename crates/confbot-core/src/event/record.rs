//! Canonical event record.

use serde::{Deserialize, Serialize};

use crate::slot::SlotTime;

/// A speaker credited on an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    pub url: Option<String>,
}

impl Speaker {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// One scheduled talk or session.
///
/// Records are immutable once built: fields are only readable, and the
/// `with_*` setters consume the record. The lower-cased search text is
/// derived from every field at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    day: u32,
    /// Minutes since midnight.
    start: u16,
    duration_minutes: u32,
    track: String,
    name: String,
    url: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    speakers: Vec<Speaker>,
    tags: Vec<String>,
    level: Option<String>,
    #[serde(skip)]
    haystack: String,
}

impl EventRecord {
    /// Create a record with the required fields.
    ///
    /// `start` is clamped below midnight.
    pub fn new(day: u32, start: u16, duration_minutes: u32, name: impl Into<String>) -> Self {
        let mut record = Self {
            day,
            start: start.min(crate::slot::MINUTES_PER_DAY - 1),
            duration_minutes,
            track: String::new(),
            name: name.into(),
            url: None,
            abstract_text: None,
            speakers: Vec::new(),
            tags: Vec::new(),
            level: None,
            haystack: String::new(),
        };
        record.reindex();
        record
    }

    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track = track.into();
        self.reindex();
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self.reindex();
        self
    }

    pub fn with_abstract(mut self, abstract_text: Option<String>) -> Self {
        self.abstract_text = abstract_text;
        self.reindex();
        self
    }

    pub fn with_speakers(mut self, speakers: Vec<Speaker>) -> Self {
        self.speakers = speakers;
        self.reindex();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self.reindex();
        self
    }

    pub fn with_level(mut self, level: Option<String>) -> Self {
        self.level = level;
        self.reindex();
        self
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Start as minutes since midnight.
    pub fn start_minutes(&self) -> u16 {
        self.start
    }

    /// End as minutes since midnight. Same-day arithmetic: no rollover.
    pub fn end_minutes(&self) -> u32 {
        u32::from(self.start) + self.duration_minutes
    }

    pub fn start_slot(&self) -> SlotTime {
        SlotTime {
            day: self.day,
            minute: self.start,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    /// Canonical order key.
    pub fn sort_key(&self) -> (u32, u16) {
        (self.day, self.start)
    }

    /// Whether `minute` on `day` falls inside `[start, end]`, both ends inclusive.
    pub fn is_running_at(&self, at: SlotTime) -> bool {
        self.day == at.day
            && u32::from(at.minute) >= u32::from(self.start)
            && u32::from(at.minute) <= self.end_minutes()
    }

    /// Whether the event has not ended yet at `at`.
    ///
    /// Events on later days are always upcoming; events on `at.day` are
    /// upcoming until their end minute has passed.
    pub fn is_upcoming_at(&self, at: SlotTime) -> bool {
        self.day > at.day || (self.day == at.day && self.end_minutes() >= u32::from(at.minute))
    }

    /// Case-insensitive substring match against every field.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.haystack.contains(needle)
    }

    fn reindex(&mut self) {
        let mut text = format!(
            "{} {:02}{:02} {} {} {}",
            self.day,
            self.start / 60,
            self.start % 60,
            self.duration_minutes,
            self.track,
            self.name
        );
        for part in [&self.url, &self.abstract_text, &self.level]
            .into_iter()
            .flatten()
        {
            text.push(' ');
            text.push_str(part);
        }
        for speaker in &self.speakers {
            text.push(' ');
            text.push_str(&speaker.name);
            if let Some(url) = &speaker.url {
                text.push(' ');
                text.push_str(url);
            }
        }
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        self.haystack = text.to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keynote() -> EventRecord {
        EventRecord::new(3, 900, 60, "Opening Keynote")
            .with_track("Main Hall")
            .with_speakers(vec![Speaker::new("Ada Lovelace", None)])
            .with_tags(vec!["Community".into()])
    }

    #[test]
    fn end_is_start_plus_duration() {
        let event = keynote();
        assert_eq!(event.end_minutes(), 960);
        assert_eq!(event.sort_key(), (3, 900));
    }

    #[test]
    fn running_window_is_inclusive() {
        let event = keynote();
        let at = |minute| SlotTime { day: 3, minute };
        assert!(!event.is_running_at(at(899)));
        assert!(event.is_running_at(at(900)));
        assert!(event.is_running_at(at(960)));
        assert!(!event.is_running_at(at(961)));
        assert!(!event.is_running_at(SlotTime { day: 4, minute: 930 }));
    }

    #[test]
    fn upcoming_uses_end_minute_on_same_day() {
        let event = keynote();
        assert!(event.is_upcoming_at(SlotTime { day: 3, minute: 960 }));
        assert!(!event.is_upcoming_at(SlotTime { day: 3, minute: 961 }));
        assert!(event.is_upcoming_at(SlotTime { day: 2, minute: 1400 }));
        assert!(!event.is_upcoming_at(SlotTime { day: 4, minute: 0 }));
    }

    #[test]
    fn haystack_covers_every_field() {
        let event = keynote().with_level(Some("Beginner".into()));
        assert!(event.matches_lowercase("lovelace"));
        assert!(event.matches_lowercase("community"));
        assert!(event.matches_lowercase("main hall"));
        assert!(event.matches_lowercase("beginner"));
        assert!(event.matches_lowercase("1500"));
        assert!(!event.matches_lowercase("rust"));
    }

    #[test]
    fn setters_reindex() {
        let event = keynote().with_track("Rust Room");
        assert!(event.matches_lowercase("rust room"));
        assert!(!event.matches_lowercase("main hall"));
    }
}
