use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::theme::Theme;
use crate::transition::{DEFAULT_SETTLE, TransitionKind};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidectl";

const MIN_SETTLE_MS: u64 = 50;
const MAX_SETTLE_MS: u64 = 5000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Load the user config. Only a missing file falls back to defaults; a file
    /// that fails to parse or validate is an error.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::path()?;
        Self::load_or_default_from(&path)
    }

    pub fn load_or_default_from(path: &Path) -> Result<Self> {
        match Self::read(path)? {
            Some(config) => Ok(config),
            None => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => anyhow::bail!("Failed to read config {}: {e}", path.display()),
        };
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Some(config))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidectl configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("light")
    }

    pub fn transition(&self) -> Option<TransitionKind> {
        self.defaults
            .as_ref()
            .and_then(|d| d.transition.as_deref())
            .map(TransitionKind::from_name)
    }

    pub fn animated(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.animated)
            .unwrap_or(true)
    }

    pub fn settle(&self) -> Duration {
        self.defaults
            .as_ref()
            .and_then(|d| d.settle_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SETTLE)
    }

    pub fn start_slide(&self) -> usize {
        self.defaults
            .as_ref()
            .and_then(|d| d.start_slide)
            .unwrap_or(1)
    }

    fn validate(&self) -> Result<()> {
        let Some(defaults) = &self.defaults else {
            return Ok(());
        };
        if let Some(theme) = &defaults.theme {
            check_theme(theme)?;
        }
        if let Some(transition) = &defaults.transition {
            check_transition(transition)?;
        }
        if let Some(ms) = defaults.settle_ms {
            check_settle(ms)?;
        }
        if defaults.start_slide == Some(0) {
            anyhow::bail!("Invalid start_slide: 0. Slides are numbered from 1.");
        }
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.theme" => {
                check_theme(value)?;
                defaults.theme = Some(value.to_string());
            }
            "defaults.transition" => {
                check_transition(value)?;
                defaults.transition = Some(value.to_string());
            }
            "defaults.animated" => {
                let animated = match value {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => anyhow::bail!("Invalid animated: {value}. Must be 'true' or 'false'."),
                };
                defaults.animated = Some(animated);
            }
            "defaults.settle_ms" => {
                let ms: u64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid settle_ms: {value}. Must be a number."))?;
                check_settle(ms)?;
                defaults.settle_ms = Some(ms);
            }
            "defaults.start_slide" => {
                let slide = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid start_slide: {value}. Must be a slide number.")
                    })?;
                defaults.start_slide = Some(slide);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.theme, defaults.transition, defaults.animated, defaults.settle_ms, defaults.start_slide"
            ),
        }
        Ok(())
    }
}

fn check_theme(value: &str) -> Result<()> {
    if Theme::all_names().contains(&value) {
        Ok(())
    } else {
        anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'.")
    }
}

fn check_transition(value: &str) -> Result<()> {
    if TransitionKind::all_names().contains(&value) {
        Ok(())
    } else {
        anyhow::bail!("Invalid transition: {value}. Must be 'slide', 'fade', or 'none'.")
    }
}

fn check_settle(ms: u64) -> Result<()> {
    if (MIN_SETTLE_MS..=MAX_SETTLE_MS).contains(&ms) {
        Ok(())
    } else {
        anyhow::bail!("Invalid settle_ms: {ms}. Must be between {MIN_SETTLE_MS} and {MAX_SETTLE_MS}.")
    }
}
