//! Presentation of events for the chat transport.
//!
//! Bodies are HTML (the transport sends them with HTML parse mode) and every
//! piece of event text is escaped before it is placed in markup. Titles and
//! descriptions of inline results are shown as plain text and are left as is.

use serde::Serialize;

use crate::event::{EventRecord, Speaker};
use crate::slot::SlotTime;

const ELLIPSIS: char = '…';

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// Keep at most `max_chars` characters, appending `…` when something was cut.
pub fn ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}

/// Escape `text` so that the result, including a trailing `…` if cut, is at
/// most `budget` characters long.
fn escape_within(text: &str, budget: usize) -> String {
    let escaped = html_escape(text);
    if escaped.chars().count() <= budget {
        return escaped;
    }
    let mut out = String::new();
    let mut used = 0;
    let mut buf = String::new();
    for c in text.chars() {
        buf.clear();
        push_escaped(&mut buf, c);
        let width = buf.chars().count();
        if used + width + 1 > budget {
            break;
        }
        out.push_str(&buf);
        used += width;
    }
    if budget > 0 {
        out.push(ELLIPSIS);
    }
    out
}

/// Rendering limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Month name used in day labels ("May 3").
    pub month_label: String,
    /// Abstract length on the current-events page.
    pub listing_abstract_chars: usize,
    /// Abstract length in inline result descriptions.
    pub card_abstract_chars: usize,
    /// Hard limit of a message body.
    pub max_message_chars: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            month_label: "May".into(),
            listing_abstract_chars: 100,
            card_abstract_chars: 200,
            max_message_chars: 4096,
        }
    }
}

/// Display bundle for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCard {
    pub title: String,
    pub description: String,
    pub body: String,
}

/// Renders events and pages.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// "May 3".
    pub fn day_label(&self, day: u32) -> String {
        format!("{} {day}", self.options.month_label)
    }

    /// Compact entry used on the current-events page.
    pub fn listing_entry(&self, event: &EventRecord) -> String {
        let short_abstract = ellipsis(
            event.abstract_text().unwrap_or_default(),
            self.options.listing_abstract_chars,
        );
        format!(
            "<code>{}</code> {}\n{} - {} minutes - {}\n{}\nTags: {}",
            clock(event.start_slot()),
            title_link(event),
            html_escape(event.track()),
            event.duration_minutes(),
            speakers_html(event.speakers()),
            html_escape(&short_abstract),
            tags_html(event.tags()),
        )
    }

    /// Full card for an inline search result.
    pub fn event_card(&self, event: &EventRecord) -> EventCard {
        let at = clock(event.start_slot());
        let description = format!(
            "{at} - {}m - {}\n{}",
            event.duration_minutes(),
            event.track(),
            ellipsis(
                event.abstract_text().unwrap_or_default(),
                self.options.card_abstract_chars
            ),
        );

        let head = format!(
            "<code>{}, {at}</code> {}\n{} track - {} minutes - {}\n",
            html_escape(&self.day_label(event.day())),
            title_link(event),
            html_escape(event.track()),
            event.duration_minutes(),
            speakers_html(event.speakers()),
        );
        let tail = format!("\nTags: {}", tags_html(event.tags()));
        let budget = self
            .options
            .max_message_chars
            .saturating_sub(head.chars().count() + tail.chars().count());
        let body = format!(
            "{head}{}{tail}",
            escape_within(event.abstract_text().unwrap_or_default(), budget)
        );

        EventCard {
            title: event.name().to_string(),
            description,
            body,
        }
    }

    /// Page listing everything running at `time`, already ordered by the caller.
    pub fn current_events_page(&self, time: SlotTime, events: &[&EventRecord]) -> String {
        let header = format!(
            "<pre>Events at {}, {}:{:02}</pre>\n",
            html_escape(&self.day_label(time.day)),
            time.hour(),
            time.minute_of_hour()
        );
        let entries: Vec<String> = events.iter().map(|e| self.listing_entry(e)).collect();
        header + &entries.join("\n\n")
    }
}

fn clock(time: SlotTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute_of_hour())
}

fn title_link(event: &EventRecord) -> String {
    match event.url() {
        Some(url) => format!("<a href='{}'>{}</a>", html_escape(url), html_escape(event.name())),
        None => html_escape(event.name()),
    }
}

fn speakers_html(speakers: &[Speaker]) -> String {
    if speakers.is_empty() {
        return "No speakers".into();
    }
    speakers
        .iter()
        .map(|s| match &s.url {
            Some(url) => format!("<a href=\"{}\">{}</a>", html_escape(url), html_escape(&s.name)),
            None => html_escape(&s.name),
        })
        .collect::<Vec<_>>()
        .join(" - ")
}

fn tags_html(tags: &[String]) -> String {
    if tags.is_empty() {
        return "No tags".into();
    }
    tags.iter()
        .map(|t| format!("<code>{}</code>", html_escape(t)))
        .collect::<Vec<_>>()
        .join(" - ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn talk() -> EventRecord {
        EventRecord::new(3, 9 * 60 + 5, 45, "Types & <Traits>")
            .with_track("Lasagna")
            .with_url(Some("https://www.pycon.it/talk".into()))
            .with_speakers(vec![
                Speaker::new("Ann", Some("https://www.pycon.it/p/ann".into())),
                Speaker::new("Bob", None),
            ])
            .with_tags(vec!["Rust".into(), "Python".into()])
            .with_abstract(Some("a".repeat(150)))
    }

    #[test]
    fn html_escape_covers_markup_chars() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn ellipsis_counts_chars_not_bytes() {
        assert_eq!(ellipsis("caffè latte", 5), "caffè…");
        assert_eq!(ellipsis("short", 10), "short");
        assert_eq!(ellipsis("exact", 5), "exact");
    }

    #[test]
    fn listing_entry_layout() {
        let entry = Formatter::default().listing_entry(&talk());
        let lines: Vec<_> = entry.lines().collect();
        assert_eq!(
            lines[0],
            "<code>09:05</code> <a href='https://www.pycon.it/talk'>Types &amp; &lt;Traits&gt;</a>"
        );
        assert_eq!(
            lines[1],
            "Lasagna - 45 minutes - <a href=\"https://www.pycon.it/p/ann\">Ann</a> - Bob"
        );
        assert_eq!(lines[2].chars().count(), 101);
        assert!(lines[2].ends_with('…'));
        assert_eq!(lines[3], "Tags: <code>Rust</code> - <code>Python</code>");
    }

    #[test]
    fn placeholders_for_missing_speakers_and_tags() {
        let entry = Formatter::default().listing_entry(&EventRecord::new(2, 600, 30, "Coffee"));
        assert!(entry.contains("No speakers"));
        assert!(entry.ends_with("Tags: No tags"));
        assert!(entry.starts_with("<code>10:00</code> Coffee\n"));
    }

    #[test]
    fn event_card_fields() {
        let card = Formatter::default().event_card(&talk());
        assert_eq!(card.title, "Types & <Traits>");
        assert!(card.description.starts_with("09:05 - 45m - Lasagna\n"));
        assert!(card.body.starts_with("<code>May 3, 09:05</code>"));
        assert!(card.body.contains("Lasagna track - 45 minutes"));
        assert!(card.body.contains(&"a".repeat(150)));
    }

    #[test]
    fn event_card_body_respects_message_limit() {
        let formatter = Formatter::new(FormatOptions {
            max_message_chars: 300,
            ..FormatOptions::default()
        });
        let event = talk().with_abstract(Some("<b>".repeat(500)));
        let card = formatter.event_card(&event);
        assert!(card.body.chars().count() <= 300);
        assert!(card.body.ends_with("Tags: <code>Rust</code> - <code>Python</code>"));
        assert!(card.body.contains('…'));
        assert!(!card.body.contains("<b>"));
    }

    #[test]
    fn page_header_pads_minutes() {
        let event = talk();
        let page = Formatter::default()
            .current_events_page(SlotTime::new(3, 9, 0).unwrap(), &[&event, &event]);
        assert!(page.starts_with("<pre>Events at May 3, 9:00</pre>\n<code>09:05</code>"));
        assert_eq!(page.matches("<code>09:05</code>").count(), 2);
        assert!(page.contains("</code>\n\n<code>09:05"));
    }
}
