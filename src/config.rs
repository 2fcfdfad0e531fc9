//! Site configuration module.
//!
//! Loads `config.toml` from the content root and merges it over the stock
//! defaults. Every key is optional; unknown keys are rejected to catch typos.
//!
//! ```toml
//! title = "My Blog"
//! description = "Notes and writing."
//! site = "https://example.com"   # Absolute origin used for feed links
//! blog_dir = "blog"              # Posts directory, relative to the content root
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, used for the feed and the index page.
    pub title: String,
    /// One-line site description.
    pub description: String,
    /// Absolute site origin (`https://host`); feed links are resolved against it.
    pub site: String,
    /// Directory holding posts, relative to the content root.
    pub blog_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: "Notes and writing.".to_string(),
            site: "https://example.com".to_string(),
            blog_dir: "blog".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        let rest = self
            .site
            .strip_prefix("https://")
            .or_else(|| self.site.strip_prefix("http://"))
            .ok_or_else(|| {
                ConfigError::Validation("site must be an absolute http(s) URL".into())
            })?;
        if rest.trim_end_matches('/').is_empty() {
            return Err(ConfigError::Validation("site must include a host".into()));
        }
        if self.blog_dir.is_empty() || Path::new(&self.blog_dir).is_absolute() {
            return Err(ConfigError::Validation(
                "blog_dir must be a relative path".into(),
            ));
        }
        Ok(())
    }

    /// The site origin without a trailing slash.
    pub fn site_root(&self) -> &str {
        self.site.trim_end_matches('/')
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Blog Configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Site title, shown on the index page and in the feed.
title = "My Blog"

# One-line description for the feed.
description = "Notes and writing."

# Absolute origin of the published site. Feed item links are built as
# <site>/blog/<post-id>/.
site = "https://example.com"

# Directory holding posts (*.md, *.mdx), relative to the content root.
blog_dir = "blog"
"##
}
