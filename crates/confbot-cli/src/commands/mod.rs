pub mod browse;
pub mod config;
pub mod schedule;
pub mod search;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use confbot_core::schedule::load_snapshot;
use confbot_core::{Config, Schedule, SlotTime};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Resolved configuration and file locations for one invocation.
pub struct Context {
    pub config: Config,
    /// Where `config set`/`reset` write; `None` means the default location.
    pub config_path: Option<PathBuf>,
    snapshot: Option<PathBuf>,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, snapshot: Option<PathBuf>) -> CliResult<Self> {
        let config = match &config_path {
            Some(path) if path.exists() => Config::load_from(path)?,
            Some(_) => Config::default(),
            None => Config::load_or_default(),
        };
        Ok(Self {
            config,
            config_path,
            snapshot,
        })
    }

    pub fn snapshot_path(&self) -> CliResult<PathBuf> {
        match &self.snapshot {
            Some(path) => Ok(path.clone()),
            None => Ok(self.config.snapshot_path()?),
        }
    }

    pub fn load_schedule(&self) -> CliResult<Schedule> {
        self.load_schedule_from(&self.snapshot_path()?)
    }

    pub fn load_schedule_from(&self, path: &Path) -> CliResult<Schedule> {
        let normalizer = self.config.normalizer()?;
        load_snapshot(path, &normalizer)
            .map_err(|e| format!("cannot load schedule from {}: {e}", path.display()).into())
    }

    /// Slot to browse: `--at YYYY-MM-DDTHH:MM` or the local wall clock.
    pub fn slot_at(&self, at: Option<&str>) -> CliResult<SlotTime> {
        Ok(self.config.window()?.slot_at(parse_at(at)?))
    }

    /// Search reference time; dates outside the conference month list everything.
    pub fn search_reference(&self, at: Option<&str>) -> CliResult<SlotTime> {
        Ok(self.config.window()?.search_reference_at(parse_at(at)?))
    }
}

fn parse_at(at: Option<&str>) -> CliResult<NaiveDateTime> {
    match at {
        Some(text) => Ok(NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
            .map_err(|e| format!("invalid --at '{text}': {e}"))?),
        None => Ok(Local::now().naive_local()),
    }
}
