//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::layout::LayoutConfig;
use crate::taxonomy::BUILTIN_SOURCE;

/// Skilltree configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub taxonomy: TaxonomyConfig,
    pub layout: LayoutConfig,
    pub profile: ProfileConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Directory holding `<source>.json` files; defaults to `<config dir>/taxonomies`
    pub dir: Option<PathBuf>,
    /// Sources loaded when none are requested explicitly
    pub default_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Label of the diagram's center node
    pub center_label: String,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            dir: None,
            default_sources: vec![BUILTIN_SOURCE.to_string()],
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            center_label: "Developer".to_string(),
        }
    }
}

const KEYS: &[&str] = &[
    "taxonomy.dir",
    "taxonomy.default_sources",
    "profile.center_label",
    "layout.width",
    "layout.center_y",
    "layout.category_radius",
    "layout.ring_spacing",
    "layout.max_skills_per_category",
    "layout.arc_fraction",
    "layout.bottom_padding",
    "layout.min_height",
];

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("SKILLTREE_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("skilltree")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.taxonomy.default_sources.is_empty() {
            return Err(anyhow!("taxonomy.default_sources must name at least one source"));
        }
        if self.profile.center_label.trim().is_empty() {
            return Err(anyhow!("profile.center_label must not be empty"));
        }
        self.layout.validate()?;
        Ok(())
    }

    /// Directory taxonomy sources are read from
    pub fn taxonomy_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.taxonomy.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("taxonomies")),
        }
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        let layout = &self.layout;
        match key {
            "taxonomy.dir" => Ok(match &self.taxonomy.dir {
                Some(dir) => dir.display().to_string(),
                None => "(default - <config dir>/taxonomies)".to_string(),
            }),
            "taxonomy.default_sources" => Ok(self.taxonomy.default_sources.join(", ")),
            "profile.center_label" => Ok(self.profile.center_label.clone()),
            "layout.width" => Ok(layout.width.to_string()),
            "layout.center_y" => Ok(layout.center_y.to_string()),
            "layout.category_radius" => Ok(layout.category_radius.to_string()),
            "layout.ring_spacing" => Ok(layout.ring_spacing.to_string()),
            "layout.max_skills_per_category" => Ok(layout.max_skills_per_category.to_string()),
            "layout.arc_fraction" => Ok(layout.arc_fraction.to_string()),
            "layout.bottom_padding" => Ok(layout.bottom_padding.to_string()),
            "layout.min_height" => Ok(layout.min_height.to_string()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `skilltree config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let parse_f64 = |value: &str| -> anyhow::Result<f64> {
            value
                .parse::<f64>()
                .with_context(|| format!("Invalid value for {}: {}", key, value))
        };

        let mut updated = self.clone();
        match key {
            "taxonomy.dir" => {
                updated.taxonomy.dir = match value.trim() {
                    "" => None,
                    dir => Some(PathBuf::from(dir)),
                };
            }
            "taxonomy.default_sources" => {
                updated.taxonomy.default_sources = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "profile.center_label" => {
                updated.profile.center_label = value.trim().to_string();
            }
            "layout.width" => updated.layout.width = parse_f64(value)?,
            "layout.center_y" => updated.layout.center_y = parse_f64(value)?,
            "layout.category_radius" => updated.layout.category_radius = parse_f64(value)?,
            "layout.ring_spacing" => updated.layout.ring_spacing = parse_f64(value)?,
            "layout.max_skills_per_category" => {
                updated.layout.max_skills_per_category = value
                    .parse()
                    .with_context(|| format!("Invalid max_skills_per_category value: {}", value))?;
            }
            "layout.arc_fraction" => updated.layout.arc_fraction = parse_f64(value)?,
            "layout.bottom_padding" => updated.layout.bottom_padding = parse_f64(value)?,
            "layout.min_height" => updated.layout.min_height = parse_f64(value)?,
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `skilltree config list` to see available keys.",
                    key
                ));
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        KEYS.iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
