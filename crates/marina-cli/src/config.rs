use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::CONFIG_ENV;
use crate::ui::OutputMode;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarinaConfig {
    pub parsing: ParsingSection,
    pub ui: UiSection,
    pub log: LogSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParsingSection {
    /// Reject malformed fields instead of coercing them.
    pub strict: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiSection {
    pub format: Option<OutputMode>,
    pub ascii: bool,
    pub no_color: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSection {
    pub filter: Option<String>,
}

/// Config file location: `MARINA_CONFIG`, else the XDG default.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// Read the config at `path`. A missing file yields the defaults.
pub fn read_config(path: &Path) -> anyhow::Result<MarinaConfig> {
    if !path.exists() {
        return Ok(MarinaConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    parse_config(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

fn parse_config(contents: &str) -> Result<MarinaConfig, toml::de::Error> {
    toml::from_str(contents)
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("marina"));
        }
    }
    Ok(home_dir()?.join(".config").join("marina"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
