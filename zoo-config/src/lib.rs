use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;
use zoo_core::{AnimalSpec, Bounds, Species, DEFAULT_TICK};

// --- Error Type ---
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse JSON config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

// --- Enums for Choices ---
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Stdio,
    Null,
}

// --- Configuration Sections ---

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaSettings {
    pub width: i32,
    pub height: i32,
}

impl ArenaSettings {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AnimalConfig {
    pub species: Species,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub spec: AnimalSpec,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpriteSettings {
    #[serde(default = "default_sprite_directory")]
    pub directory: PathBuf,
}

fn default_sprite_directory() -> PathBuf {
    PathBuf::from("pictures")
}

impl Default for SpriteSettings {
    fn default() -> Self {
        Self {
            directory: default_sprite_directory(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    #[serde(rename = "type")]
    pub sender_type: SenderType,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub sender: SenderConfig,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            sender: SenderConfig {
                sender_type: SenderType::Null,
            },
        }
    }
}

fn default_tick_millis() -> u64 { DEFAULT_TICK.as_millis() as u64 }
fn default_framerate() -> u32 { 20 }
fn default_eat_distance() -> f64 { 10.0 }
fn default_max_animals() -> usize { 10 }

// --- Top-Level Config Struct ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    #[serde(default = "default_framerate")]
    pub framerate: u32,
    #[serde(default)]
    pub arena: ArenaSettings,
    #[serde(default = "default_eat_distance")]
    pub eat_distance: f64,
    #[serde(default = "default_max_animals")]
    pub max_animals: usize,
    #[serde(default)]
    pub sprites: SpriteSettings,
    #[serde(default)]
    pub animals: Vec<AnimalConfig>,
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Config {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.framerate as f64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_millis == 0 {
            return Err(ConfigError::Validation("Tick length cannot be zero.".to_string()));
        }
        if self.framerate == 0 {
            return Err(ConfigError::Validation("Framerate cannot be zero.".to_string()));
        }
        if self.arena.width <= 0 || self.arena.height <= 0 {
            return Err(ConfigError::Validation("Arena dimensions must be positive.".to_string()));
        }
        if !(self.eat_distance.is_finite() && self.eat_distance >= 0.0) {
            return Err(ConfigError::Validation("Eat distance must be a non-negative number.".to_string()));
        }
        if self.animals.len() > self.max_animals {
            return Err(ConfigError::Validation(format!(
                "{} animals configured but the zoo holds at most {}.",
                self.animals.len(),
                self.max_animals
            )));
        }
        Ok(())
    }
}

// --- Loading Function ---

/// Reads a JSON config, or TOML when the file ends in `.toml`, and validates it.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    config.validate()?;
    Ok(config)
}
