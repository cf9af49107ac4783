// Configuration management
// Board parameters and preferences, persisted to disk as TOML

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_GRID_SIZE: usize = 10;
pub const DEFAULT_MINE_COUNT: usize = 25;
// Widest board that still fits an 80-column terminal
pub const MAX_GRID_SIZE: usize = 36;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid_size must be at least 1")]
    EmptyGrid,
    #[error("grid_size {0} exceeds the maximum of 36")]
    GridTooLarge(usize),
    #[error("mine_count {mines} must be less than the {cells} cells of a {size}x{size} grid")]
    TooManyMines { mines: usize, size: usize, cells: usize },
}

/// Validated board parameters handed to the game controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub size: usize,
    pub mines: usize,
    pub seed: Option<u64>,
}

/// User configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub grid_size: usize,
    pub mine_count: usize,
    pub ascii_icons: bool, // Use ASCII fallback glyphs for mines and flags
    pub language: String,  // "en" or "zh"
    pub seed: Option<u64>, // Fixed seed for reproducible boards
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("zh") {
            "zh".to_string()
        } else {
            "en".to_string()
        };

        Config {
            grid_size: DEFAULT_GRID_SIZE,
            mine_count: DEFAULT_MINE_COUNT,
            ascii_icons: false,
            language: lang,
            seed: None,
        }
    }
}

impl Config {
    /// Check board parameters; a mine count that does not leave a safe cell is rejected
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let cells = match self.grid_size.checked_mul(self.grid_size) {
            Some(cells) if self.grid_size <= MAX_GRID_SIZE => cells,
            _ => return Err(ConfigError::GridTooLarge(self.grid_size)),
        };
        if self.mine_count >= cells {
            return Err(ConfigError::TooManyMines {
                mines: self.mine_count,
                size: self.grid_size,
                cells,
            });
        }
        Ok(GameConfig {
            size: self.grid_size,
            mines: self.mine_count,
            seed: self.seed,
        })
    }
}

/// Get the configuration file path
/// e.g. ~/.config/tkswpr/tkswpr.toml on Linux, current directory as fallback
pub fn config_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let name = exe.file_stem()?.to_str()?.to_string();
    match ProjectDirs::from("com", "xhbl", &name) {
        Some(proj) => Some(proj.config_dir().join(format!("{}.toml", name))),
        None => env::current_dir().ok().map(|dir| dir.join(format!("{}.toml", name))),
    }
}

/// Load configuration from disk, or create default if not found
pub fn load_or_create_config() -> Config {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Config::default(),
    }
}

/// Read the config at `path`; unreadable or malformed files fall back to defaults,
/// a missing file is created with defaults
pub fn load_config_from(path: &Path) -> Config {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(s) => match toml::from_str::<Config>(&s) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring malformed config {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("cannot read config {}: {}", path.display(), e),
        }
        return Config::default();
    }
    let cfg = Config::default();
    save_config_to(&cfg, path);
    cfg
}

/// Save configuration to disk as TOML
pub fn save_config_to(cfg: &Config, path: &Path) {
    let s = match toml::to_string(cfg) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("cannot serialize config: {}", e);
            return;
        }
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(e) = fs::write(path, s) {
        log::warn!("cannot write config {}: {}", path.display(), e);
    }
}
