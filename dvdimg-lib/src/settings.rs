//! Persistent defaults from `~/.config/dvdimg/settings.toml`.
//!
//! ```toml
//! [extract]
//! verify = false
//! decrypt_via_reader = false
//! video_ts_dir = "/mnt/dvd/VIDEO_TS"
//! ```
//!
//! Command-line flags always win over these values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::extract::RunOptions;

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("dvdimg").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extract: ExtractSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    pub verify: bool,
    pub decrypt_via_reader: bool,
    /// `VIDEO_TS` directory used as the independent reader
    pub video_ts_dir: Option<PathBuf>,
}

impl ExtractSettings {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            verify: self.verify,
            decrypt_via_reader: self.decrypt_via_reader,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// reported and also yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::parse(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from the canonical location.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }
}
