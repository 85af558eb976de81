mod config;

pub use config::{
    CeilingConfig, ConferenceConfig, Config, FormatConfig, NavigationConfig, ScraperConfig,
    SearchConfig,
};

use std::path::PathBuf;

/// Returns `~/.config/confbot[-dev]/` based on CONFBOT_ENV.
///
/// Set CONFBOT_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CONFBOT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("confbot-dev")
    } else {
        base_dir.join("confbot")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
