//! Event records and normalization of scraped schedule data.

mod raw;
mod record;

pub use raw::{parse_hhmm, Normalizer, RawEvent, RawNumber, RawSpeaker};
pub use record::{EventRecord, Speaker};
