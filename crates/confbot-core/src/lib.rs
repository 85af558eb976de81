//! # confbot Core Library
//!
//! This library answers "what is happening at the conference right now?"
//! from a scraped schedule snapshot. The chat transport and the scraper are
//! thin layers over it; the `confbot` CLI exercises the same operations
//! locally.
//!
//! ## Architecture
//!
//! - **Event model**: typed [`EventRecord`]s normalized from loosely-typed
//!   scraper output
//! - **Schedule store**: an immutable, sorted [`Schedule`] snapshot, swapped
//!   wholesale on reload through [`SharedSchedule`]
//! - **Resolution**: [`current_events`] for a moment in time and
//!   [`SlotAdvancer`] to skip forward over gaps
//! - **Search**: [`QueryEngine`] with fallback to upcoming events
//! - **Presentation**: navigation tokens and HTML cards for the transport
//!
//! ## Key Components
//!
//! - [`Schedule`]: normalized event store
//! - [`SlotAdvancer`]: next non-empty half-hour slot
//! - [`QueryEngine`]: lazy free-text search
//! - [`Config`]: Application configuration management

pub mod advancer;
pub mod error;
pub mod event;
pub mod format;
pub mod navigation;
pub mod resolver;
pub mod schedule;
pub mod search;
pub mod slot;
pub mod storage;

pub use advancer::{ResolvedSlot, SlotAdvancer};
pub use error::{ConfigError, CoreError, NavigationError, Result, ScheduleError, ValidationError};
pub use event::{EventRecord, Normalizer, RawEvent, RawNumber, RawSpeaker, Speaker};
pub use format::{EventCard, FormatOptions, Formatter};
pub use navigation::{decode_time, encode_time, NavButton, Navigator};
pub use resolver::current_events;
pub use schedule::{Schedule, SharedSchedule};
pub use search::{QueryEngine, Search};
pub use slot::{ConferenceWindow, SlotTime};
pub use storage::Config;
