//! Navigation tokens for the chat keyboard.
//!
//! A token carries a [`SlotTime`] as `DDxHHxMM` (each part zero-padded to two
//! digits). The transport attaches tokens to buttons and hands them back when
//! one is pressed.

use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::event::EventRecord;
use crate::slot::{ConferenceWindow, SlotTime};

const SEPARATOR: char = 'x';

/// Encode a slot as a navigation token.
pub fn encode_time(time: SlotTime) -> String {
    format!(
        "{:02}{SEPARATOR}{:02}{SEPARATOR}{:02}",
        time.day,
        time.hour(),
        time.minute_of_hour()
    )
}

/// Decode a token produced by [`encode_time`].
///
/// # Errors
/// Returns [`NavigationError::Malformed`] unless the token is exactly three
/// `x`-separated unsigned integers, and [`NavigationError::OutOfRange`] for an
/// hour or minute outside the clock.
pub fn decode_time(token: &str) -> Result<SlotTime, NavigationError> {
    let malformed = || NavigationError::Malformed(token.to_string());

    let mut parts = token.trim().split(SEPARATOR).map(|part| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse::<u32>().ok()
    });
    let (Some(Some(day)), Some(Some(hour)), Some(Some(minute)), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    SlotTime::new(day, hour, minute)
}

/// One keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavButton {
    pub label: String,
    pub token: String,
}

impl NavButton {
    fn new(label: impl Into<String>, time: SlotTime) -> Self {
        Self {
            label: label.into(),
            token: encode_time(time),
        }
    }
}

/// Builds the time-navigation keyboard for a resolved slot.
#[derive(Debug, Clone)]
pub struct Navigator {
    window: ConferenceWindow,
    step_minutes: u16,
}

impl Navigator {
    pub fn new(window: ConferenceWindow, step_minutes: u16) -> Self {
        Self {
            window,
            step_minutes: step_minutes.max(1),
        }
    }

    /// Two rows: `-N min` / `+N min`, then one `Day N` button per talk day
    /// keeping the current time of day.
    pub fn keyboard(&self, time: SlotTime) -> Vec<Vec<NavButton>> {
        let step = i64::from(self.step_minutes);
        let arrows = vec![
            NavButton::new(format!("-{step} min"), time.add_minutes(-step)),
            NavButton::new(format!("+{step} min"), time.add_minutes(step)),
        ];
        let days = self
            .window
            .talk_days()
            .enumerate()
            .map(|(i, day)| NavButton::new(format!("Day {}", i + 1), SlotTime { day, ..time }))
            .collect();
        vec![arrows, days]
    }

    /// Button that jumps to everything running when `event` starts.
    pub fn parallel_events_button(&self, event: &EventRecord) -> NavButton {
        NavButton::new("Show parallel events", event.start_slot())
    }
}
