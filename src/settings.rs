//! Layered settings: defaults, then an optional `refindex.{toml,json,yaml}`
//! file, then `REFINDEX_*` environment variables (`__` separates levels,
//! e.g. `REFINDEX_SHORTCUTS__ENABLED=false`).

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_FILE: &str = "refindex";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_filter: String,
    pub shortcuts: ShortcutSettings,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShortcutSettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// JSON file holding the configuration tree.
    pub tree: Option<PathBuf>,
    /// Seed the index by scanning the tree for `_.uuid` attributes.
    pub build_index: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            shortcuts: ShortcutSettings::default(),
            store: StoreSettings::default(),
        }
    }
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { tree: None, build_index: true }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_FILE)
    }
    /// `name` is a file name with or without extension; a missing file is not an error.
    pub fn load_from(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("REFINDEX").prefix_separator("_").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
    pub fn from_toml(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
