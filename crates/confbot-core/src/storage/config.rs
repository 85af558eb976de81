//! TOML-based application configuration.
//!
//! Stores:
//! - The conference window (month, days, workshop days, ceiling)
//! - Navigation grid and slot search cap
//! - Inline search limit
//! - Formatting limits
//! - Scraper site URL and snapshot location
//!
//! Configuration is stored at `~/.config/confbot/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use super::data_dir;
use crate::advancer::SlotAdvancer;
use crate::error::ConfigError;
use crate::event::Normalizer;
use crate::format::{FormatOptions, Formatter};
use crate::navigation::Navigator;
use crate::slot::{ConferenceWindow, SlotTime};

/// Last moment of the conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeilingConfig {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Conference window configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceConfig {
    #[serde(default = "default_conference_name")]
    pub name: String,
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default = "default_month")]
    pub month: u32,
    #[serde(default = "default_month_label")]
    pub month_label: String,
    /// Day of the month of the first conference day.
    #[serde(default = "default_first_day")]
    pub first_day: u32,
    #[serde(default = "default_days")]
    pub days: u32,
    /// Leading days without talks; they get no day button.
    #[serde(default = "default_workshop_days")]
    pub workshop_days: u32,
    #[serde(default = "default_ceiling")]
    pub ceiling: CeilingConfig,
}

/// Navigation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u16,
    /// Slot search cap. Defaults to the number of slots up to the ceiling.
    #[serde(default)]
    pub max_steps: Option<usize>,
}

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_inline_limit")]
    pub inline_limit: usize,
}

/// Formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_listing_abstract_chars")]
    pub listing_abstract_chars: usize,
    #[serde(default = "default_card_abstract_chars")]
    pub card_abstract_chars: usize,
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

/// Scraper output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Base for relative links found on the schedule page.
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,
    /// Snapshot file. Defaults to `schedule.json` in the data directory.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/confbot/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub conference: ConferenceConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
}

// Default functions
fn default_conference_name() -> String {
    "PyCon Italia".into()
}
fn default_year() -> i32 {
    2019
}
fn default_month() -> u32 {
    5
}
fn default_month_label() -> String {
    "May".into()
}
fn default_first_day() -> u32 {
    2
}
fn default_days() -> u32 {
    4
}
fn default_workshop_days() -> u32 {
    1
}
fn default_ceiling() -> CeilingConfig {
    CeilingConfig {
        day: 5,
        hour: 18,
        minute: 0,
    }
}
fn default_slot_minutes() -> u16 {
    30
}
fn default_inline_limit() -> usize {
    20
}
fn default_listing_abstract_chars() -> usize {
    100
}
fn default_card_abstract_chars() -> usize {
    200
}
fn default_max_message_chars() -> usize {
    4096
}
fn default_site_base_url() -> String {
    "https://www.pycon.it".into()
}

impl Default for ConferenceConfig {
    fn default() -> Self {
        Self {
            name: default_conference_name(),
            year: default_year(),
            month: default_month(),
            month_label: default_month_label(),
            first_day: default_first_day(),
            days: default_days(),
            workshop_days: default_workshop_days(),
            ceiling: default_ceiling(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            slot_minutes: default_slot_minutes(),
            max_steps: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            inline_limit: default_inline_limit(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            listing_abstract_chars: default_listing_abstract_chars(),
            card_abstract_chars: default_card_abstract_chars(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            site_base_url: default_site_base_url(),
            snapshot_path: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part);

                let new_value = match existing {
                    // Empty clears an optional value; required fields reject null later.
                    Some(_) if value.is_empty() => serde_json::Value::Null,
                    Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    Some(serde_json::Value::Number(_)) => {
                        let n = value
                            .parse::<i64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    Some(serde_json::Value::Object(_)) | Some(serde_json::Value::Array(_)) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    Some(serde_json::Value::String(_)) => serde_json::Value::String(value.into()),
                    // Unset optional value: numbers stay numbers, anything else is text.
                    Some(serde_json::Value::Null) => match value.parse::<i64>() {
                        Ok(n) => serde_json::Value::Number(n.into()),
                        Err(_) => serde_json::Value::String(value.into()),
                    },
                    None => return Err(unknown()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config location.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/confbot"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit file.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result no longer forms a valid configuration.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.window()?;
        *self = updated;
        Ok(())
    }

    /// The conference window described by this config.
    ///
    /// # Errors
    /// Returns an error if the ceiling is not a valid clock time or the
    /// window has no days.
    pub fn window(&self) -> Result<ConferenceWindow, ConfigError> {
        let c = &self.conference;
        if c.days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "conference.days".into(),
                message: "must be at least 1".into(),
            });
        }
        if !(1..=12).contains(&c.month) {
            return Err(ConfigError::InvalidValue {
                key: "conference.month".into(),
                message: format!("{} is not a month", c.month),
            });
        }
        let ceiling = SlotTime::new(c.ceiling.day, c.ceiling.hour, c.ceiling.minute).map_err(
            |e| ConfigError::InvalidValue {
                key: "conference.ceiling".into(),
                message: e.to_string(),
            },
        )?;
        Ok(ConferenceWindow {
            year: c.year,
            month: c.month,
            first_day: c.first_day,
            days: c.days,
            workshop_days: c.workshop_days,
            ceiling,
        })
    }

    /// Slot advancer for the configured window and grid.
    ///
    /// # Errors
    /// See [`Config::window`].
    pub fn advancer(&self) -> Result<SlotAdvancer, ConfigError> {
        let advancer =
            SlotAdvancer::new(&self.window()?).with_slot_minutes(self.navigation.slot_minutes);
        Ok(match self.navigation.max_steps {
            Some(max_steps) => advancer.with_max_steps(max_steps),
            None => advancer,
        })
    }

    /// # Errors
    /// See [`Config::window`].
    pub fn navigator(&self) -> Result<Navigator, ConfigError> {
        Ok(Navigator::new(self.window()?, self.navigation.slot_minutes))
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::new(FormatOptions {
            month_label: self.conference.month_label.clone(),
            listing_abstract_chars: self.format.listing_abstract_chars,
            card_abstract_chars: self.format.card_abstract_chars,
            max_message_chars: self.format.max_message_chars,
        })
    }

    /// Normalizer resolving relative links against the site base URL.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse.
    pub fn normalizer(&self) -> Result<Normalizer, ConfigError> {
        let base = Url::parse(&self.scraper.site_base_url).map_err(|e| ConfigError::InvalidValue {
            key: "scraper.site_base_url".into(),
            message: e.to_string(),
        })?;
        Ok(Normalizer::new().with_base_url(base))
    }

    /// Snapshot location: the configured path or `schedule.json` next to the config.
    ///
    /// # Errors
    /// Returns an error if no path is configured and the data directory
    /// cannot be created.
    pub fn snapshot_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.scraper.snapshot_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::path()?.with_file_name("schedule.json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.search.inline_limit, 20);
        assert_eq!(parsed.conference.ceiling.hour, 18);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [conference]
            name = "EuroPython"
            month = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.conference.name, "EuroPython");
        assert_eq!(cfg.conference.month, 7);
        assert_eq!(cfg.conference.first_day, 2);
        assert_eq!(cfg.navigation.slot_minutes, 30);
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("conference.month_label").as_deref(), Some("May"));
        assert_eq!(cfg.get("search.inline_limit").as_deref(), Some("20"));
        assert_eq!(cfg.get("nope"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn set_by_dotted_key() {
        let mut cfg = Config::default();
        cfg.set("search.inline_limit", "5").unwrap();
        cfg.set("conference.month_label", "July").unwrap();
        cfg.set("navigation.max_steps", "12").unwrap();
        assert_eq!(cfg.search.inline_limit, 5);
        assert_eq!(cfg.conference.month_label, "July");
        assert_eq!(cfg.navigation.max_steps, Some(12));
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("search.nope", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set("nope.deeper", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(cfg.set("search.inline_limit", "many").is_err());
        assert!(cfg.set("conference.ceiling.hour", "25").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn empty_value_clears_optional_settings() {
        let mut cfg = Config::default();
        cfg.set("navigation.max_steps", "12").unwrap();
        cfg.set("scraper.snapshot_path", "/tmp/schedule.json").unwrap();
        assert_eq!(
            cfg.scraper.snapshot_path,
            Some(PathBuf::from("/tmp/schedule.json"))
        );

        cfg.set("navigation.max_steps", "").unwrap();
        cfg.set("scraper.snapshot_path", "").unwrap();
        assert_eq!(cfg, Config::default());

        assert!(matches!(
            cfg.set("search.inline_limit", ""),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn window_from_defaults() {
        let window = Config::default().window().unwrap();
        assert_eq!(window.first_day, 2);
        assert_eq!(window.last_day(), 5);
        assert_eq!(window.ceiling, SlotTime::new(5, 18, 0).unwrap());
    }

    #[test]
    fn save_to_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.scraper.snapshot_path = Some(dir.path().join("schedule.json"));
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.snapshot_path().unwrap(), dir.path().join("schedule.json"));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "conference = 3").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn normalizer_requires_valid_base_url() {
        let mut cfg = Config::default();
        assert!(cfg.normalizer().is_ok());
        cfg.scraper.site_base_url = "not a url".into();
        assert!(cfg.normalizer().is_err());
    }
}
