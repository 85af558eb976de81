//! Loosely-typed scraped records and their normalization.
//!
//! The scraper emits one JSON object per event with every field optional;
//! numbers sometimes arrive as strings. [`Normalizer`] turns those into
//! [`EventRecord`]s or reports a [`ValidationError`].

use serde::{Deserialize, Serialize};
use url::Url;

use super::record::{EventRecord, Speaker};
use crate::error::ValidationError;

/// A number that may have been scraped as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Int(i64),
    Text(String),
}

impl RawNumber {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<i64> for RawNumber {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for RawNumber {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSpeaker {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One scraped event, exactly as the scraper produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<RawNumber>,
    /// Start time, "HHMM".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speakers: Vec<RawSpeaker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Parse an "HHMM" start time into minutes since midnight.
///
/// Accepts "0930", "930", "09:30", "9:30" or the integer 930. A colon form
/// needs a one or two digit hour and a two digit minute.
pub fn parse_hhmm(value: &RawNumber) -> Option<u16> {
    let packed = match value {
        RawNumber::Int(n) => *n,
        RawNumber::Text(s) => match s.trim().split_once(':') {
            Some((hour, minute)) => {
                if !(1..=2).contains(&hour.len()) || minute.len() != 2 {
                    return None;
                }
                digits(hour)? * 100 + digits(minute)?
            }
            None => {
                let text = s.trim();
                if text.len() > 4 {
                    return None;
                }
                digits(text)?
            }
        },
    };
    if !(0..=2359).contains(&packed) {
        return None;
    }
    let (hour, minute) = (packed / 100, packed % 100);
    if hour >= 24 || minute >= 60 {
        return None;
    }
    Some((hour * 60 + minute) as u16)
}

fn digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Turns [`RawEvent`]s into [`EventRecord`]s.
///
/// Relative links (as found on the schedule page) are resolved against the
/// site base URL when one is configured; a `#` placeholder means "no link".
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    base_url: Option<Url>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Validate and coerce one record. `index` is only used for error reporting.
    ///
    /// # Errors
    /// Fails when `name`, `day` or `time` is missing, or when any present
    /// field has the wrong shape.
    pub fn normalize(&self, index: usize, raw: &RawEvent) -> Result<EventRecord, ValidationError> {
        let name = raw
            .name
            .as_deref()
            .map(|n| n.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingField {
                index,
                field: "name",
            })?;

        let time = raw.time.as_ref().ok_or(ValidationError::MissingField {
            index,
            field: "time",
        })?;
        let start = parse_hhmm(time).ok_or_else(|| ValidationError::InvalidTime {
            index,
            value: match time {
                RawNumber::Int(n) => n.to_string(),
                RawNumber::Text(s) => s.clone(),
            },
        })?;

        let day = raw.day.as_ref().ok_or(ValidationError::MissingField {
            index,
            field: "day",
        })?;
        let day = day
            .as_i64()
            .and_then(|d| u32::try_from(d).ok())
            .ok_or_else(|| ValidationError::InvalidValue {
                index,
                field: "day",
                message: format!("{day:?} is not a non-negative integer"),
            })?;

        let duration = match &raw.duration {
            None => 0,
            Some(value) => value
                .as_i64()
                .and_then(|d| u32::try_from(d).ok())
                .ok_or_else(|| ValidationError::InvalidValue {
                    index,
                    field: "duration",
                    message: format!("{value:?} is not a non-negative integer"),
                })?,
        };

        let url = self.resolve_link(index, "url", raw.url.as_deref())?;

        let mut speakers = Vec::with_capacity(raw.speakers.len());
        for speaker in &raw.speakers {
            let speaker_name = speaker.name.as_deref().map(str::trim).unwrap_or("");
            if speaker_name.is_empty() {
                return Err(ValidationError::MissingField {
                    index,
                    field: "speakers.name",
                });
            }
            let speaker_url = self.resolve_link(index, "speakers.url", speaker.url.as_deref())?;
            speakers.push(Speaker::new(speaker_name, speaker_url));
        }

        let tags = raw
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(EventRecord::new(day, start, duration, name)
            .with_track(raw.track.as_deref().unwrap_or("").trim())
            .with_url(url)
            .with_abstract(raw.abstract_text.clone().filter(|a| !a.trim().is_empty()))
            .with_speakers(speakers)
            .with_tags(tags)
            .with_level(
                raw.level
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            ))
    }

    fn resolve_link(
        &self,
        index: usize,
        field: &'static str,
        link: Option<&str>,
    ) -> Result<Option<String>, ValidationError> {
        let Some(link) = link.map(str::trim).filter(|l| !l.is_empty() && *l != "#") else {
            return Ok(None);
        };
        match Url::parse(link) {
            Ok(url) => Ok(Some(url.to_string())),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base
                    .join(link)
                    .map(|u| Some(u.to_string()))
                    .map_err(|e| ValidationError::InvalidValue {
                        index,
                        field,
                        message: e.to_string(),
                    }),
                None => Err(ValidationError::InvalidValue {
                    index,
                    field,
                    message: format!("relative link '{link}' without a site base URL"),
                }),
            },
            Err(e) => Err(ValidationError::InvalidValue {
                index,
                field,
                message: e.to_string(),
            }),
        }
    }
}
