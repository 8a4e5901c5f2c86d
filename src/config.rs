use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shortcut::{Shortcut, ShortcutError, ShortcutMatcher};
use crate::utils::{self, Platform};

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub platform: PlatformSetting,
    #[serde(default)]
    pub shortcuts: Shortcuts,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

/// Which platform's modifier conventions shortcuts follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSetting {
    #[default]
    Auto,
    Apple,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shortcuts {
    #[serde(default = "default_new_reminder")]
    pub new_reminder: String,
    #[serde(default = "default_edit_reminder")]
    pub edit_reminder: String,
    #[serde(default = "default_delete_reminder")]
    pub delete_reminder: String,
    #[serde(default = "default_toggle_enabled")]
    pub toggle_enabled: String,
    #[serde(default = "default_close_window")]
    pub close_window: String,
    #[serde(default = "default_quit")]
    pub quit: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            platform: PlatformSetting::default(),
            shortcuts: Shortcuts::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            new_reminder: default_new_reminder(),
            edit_reminder: default_edit_reminder(),
            delete_reminder: default_delete_reminder(),
            toggle_enabled: default_toggle_enabled(),
            close_window: default_close_window(),
            quit: default_quit(),
        }
    }
}

impl Shortcuts {
    /// Every binding as (action, accelerator) in display order
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("new_reminder", self.new_reminder.as_str()),
            ("edit_reminder", self.edit_reminder.as_str()),
            ("delete_reminder", self.delete_reminder.as_str()),
            ("toggle_enabled", self.toggle_enabled.as_str()),
            ("close_window", self.close_window.as_str()),
            ("quit", self.quit.as_str()),
        ]
    }

    /// Parse every binding, failing on the first malformed one
    pub fn parse_all(&self) -> Result<Vec<(&'static str, Shortcut)>, ConfigError> {
        self.entries()
            .into_iter()
            .map(|(action, accelerator)| {
                accelerator
                    .parse::<Shortcut>()
                    .map(|shortcut| (action, shortcut))
                    .map_err(|source| ConfigError::InvalidShortcut {
                        action: action.to_string(),
                        source,
                    })
            })
            .collect()
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_new_reminder() -> String {
    "CmdOrCtrl+N".to_string()
}

fn default_edit_reminder() -> String {
    "Enter".to_string()
}

fn default_delete_reminder() -> String {
    "CmdOrCtrl+Backspace".to_string()
}

fn default_toggle_enabled() -> String {
    "Space".to_string()
}

fn default_close_window() -> String {
    "CmdOrCtrl+W".to_string()
}

fn default_quit() -> String {
    "CmdOrCtrl+Q".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid shortcut for {action}: {source}")]
    InvalidShortcut {
        action: String,
        #[source]
        source: ShortcutError,
    },
}

impl Config {
    /// Load configuration from the profile's config directory, creating a
    /// default file if none exists yet
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from an explicit file, creating it with defaults if
    /// missing
    pub fn load_from_path(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            let mut config = Config::default();
            if let Err(e) = config.save_to_path(config_path) {
                tracing::error!(
                    path = %config_path.display(),
                    error = %e,
                    "failed to save default config"
                );
                return Err(e);
            }
            tracing::info!(path = %config_path.display(), "created default config");
            Ok(config)
        }
    }

    /// Save configuration to the profile's config directory
    pub fn save_with_profile(&mut self, profile: utils::Profile) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    /// The platform shortcuts are matched for, honouring an explicit override
    pub fn platform(&self) -> Platform {
        match self.platform {
            PlatformSetting::Auto => Platform::current(),
            PlatformSetting::Apple => Platform::Apple,
            PlatformSetting::Other => Platform::Other,
        }
    }

    pub fn matcher(&self) -> ShortcutMatcher {
        ShortcutMatcher::new(self.platform())
    }
}
