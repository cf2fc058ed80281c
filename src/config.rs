//! Configuration of the store and of the optional task attributes.
//!
//! Values are layered, highest priority first: command-line flags, the TOML
//! config file, compiled defaults. A missing default config file is not an
//! error; an explicit `--config` path that does not exist is.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::model::Priority;

/// Slot key the task list is stored under.
pub const DEFAULT_KEY: &str = "todo_tasks_v1";

/// Which end of the list new tasks go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertAt {
    Front,
    Back,
}

impl FromStr for InsertAt {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(InsertAt::Front),
            "back" => Ok(InsertAt::Back),
            other => Err(format!("unknown insert position '{}', expected front or back", other)),
        }
    }
}

/// Resolved store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub key: String,
    pub insert: InsertAt,
    /// Whether tasks carry a priority.
    pub priority: bool,
    /// Whether tasks carry a category.
    pub category: bool,
    pub default_priority: Option<Priority>,
    pub default_category: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            key: DEFAULT_KEY.to_string(),
            insert: InsertAt::Front,
            priority: true,
            category: true,
            default_priority: Some(Priority::Medium),
            default_category: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    store: StoreSection,
    attributes: AttributesSection,
}

/// `[store]` section of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoreSection {
    key: Option<String>,
    insert: Option<InsertAt>,
}

/// `[attributes]` section of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AttributesSection {
    priority: Option<bool>,
    category: Option<bool>,
    default_priority: Option<Priority>,
    default_category: Option<String>,
}

/// Overrides coming from the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub insert: Option<InsertAt>,
}

impl StoreConfig {
    /// Load the configuration from `explicit` if given, else from the
    /// default path if it exists, and apply the command-line overrides.
    pub fn load(explicit: Option<&Path>, default_path: Option<PathBuf>, overrides: &Overrides) -> Result<Self> {
        let file = match explicit {
            Some(path) => read_config_file(path)?,
            None => match default_path {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => ConfigFile::default(),
            },
        };
        Ok(Self::resolve(&file, overrides))
    }

    fn resolve(file: &ConfigFile, overrides: &Overrides) -> Self {
        let defaults = Self::default();
        let attributes = &file.attributes;
        StoreConfig {
            key: file.store.key.clone().unwrap_or(defaults.key),
            insert: overrides
                .insert
                .or(file.store.insert)
                .unwrap_or(defaults.insert),
            priority: attributes.priority.unwrap_or(defaults.priority),
            category: attributes.category.unwrap_or(defaults.category),
            default_priority: attributes.default_priority.or(defaults.default_priority),
            default_category: attributes
                .default_category
                .clone()
                .filter(|c| !c.trim().is_empty())
                .or(defaults.default_category),
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}.", path.display()))?;
    let file = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}.", path.display()))?;
    Ok(file)
}
