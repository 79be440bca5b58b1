//! Game configuration loaded from `config.toml`.
//!
//! A missing file means defaults; missing keys fall back to their own defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{error::ConfigError, generators::Generator, session::Rules};

/// Largest supported maze exponent; `2^7 = 128` cells per side still fits `u8` coordinates.
pub const MAX_ITERS: u8 = 7;

/// Looked up in the working directory when no path is given.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: Rules,
    /// Fixed seed for reproducible games; a fresh OS seed otherwise.
    pub seed: Option<u64>,
    pub log_dir: PathBuf,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    memory: TomlMemory,
    #[serde(default)]
    pursuer: TomlPursuer,
    #[serde(default)]
    ally: TomlAlly,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_iters")]
    iters: u8,
    #[serde(default)]
    generator: Generator,
}

#[derive(Deserialize, Debug)]
struct TomlMemory {
    #[serde(default = "default_forget_threshold")]
    forget_threshold: u32,
    #[serde(default = "default_visibility_radius")]
    visibility_radius: u8,
}

#[derive(Deserialize, Debug)]
struct TomlPursuer {
    #[serde(default = "default_charge_distance")]
    charge_distance: u8,
}

#[derive(Deserialize, Debug)]
struct TomlAlly {
    #[serde(default = "default_ally_enabled")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_log_dir")]
    log_dir: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

// ── Defaults ──

fn default_iters() -> u8 { 5 }
fn default_forget_threshold() -> u32 { 32 }
fn default_visibility_radius() -> u8 { 5 }
fn default_charge_distance() -> u8 { 3 }
fn default_ally_enabled() -> bool { true }
fn default_log_dir() -> String { ".".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze {
            iters: default_iters(),
            generator: Generator::default(),
        }
    }
}

impl Default for TomlMemory {
    fn default() -> Self {
        TomlMemory {
            forget_threshold: default_forget_threshold(),
            visibility_radius: default_visibility_radius(),
        }
    }
}

impl Default for TomlPursuer {
    fn default() -> Self {
        TomlPursuer {
            charge_distance: default_charge_distance(),
        }
    }
}

impl Default for TomlAlly {
    fn default() -> Self {
        TomlAlly {
            enabled: default_ally_enabled(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            seed: None,
            log_dir: default_log_dir(),
            log_level: default_log_level(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `path`, or from `config.toml` in the working directory.
    /// Only the implicit `config.toml` may be missing, which yields the defaults.
    /// An explicit path must exist; unreadable or invalid files are errors.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !path.exists() {
                    tracing::debug!("[config] no {}, using defaults", DEFAULT_CONFIG_PATH);
                    return Ok(GameConfig::default());
                }
                path
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let toml_cfg = toml::from_str::<TomlConfig>(&text)
            .map_err(|source| ConfigError::Parse { path, source })?;
        let config = GameConfig::from_toml(toml_cfg);
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let toml_cfg = toml::from_str::<TomlConfig>(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        let config = GameConfig::from_toml(toml_cfg);
        config.validate()?;
        Ok(config)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        GameConfig {
            rules: Rules {
                iters: toml_cfg.maze.iters,
                forget_threshold: toml_cfg.memory.forget_threshold,
                visibility_radius: toml_cfg.memory.visibility_radius,
                charge_distance: toml_cfg.pursuer.charge_distance,
                ally: toml_cfg.ally.enabled,
                generator: toml_cfg.maze.generator,
            },
            seed: toml_cfg.general.seed,
            log_dir: PathBuf::from(toml_cfg.general.log_dir),
            log_level: toml_cfg.general.log_level,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ITERS).contains(&self.rules.iters) {
            return Err(ConfigError::Invalid {
                key: "maze.iters",
                reason: format!("must be between 1 and {}, got {}", MAX_ITERS, self.rules.iters),
            });
        }
        if self.rules.forget_threshold == 0 {
            return Err(ConfigError::Invalid {
                key: "memory.forget_threshold",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
