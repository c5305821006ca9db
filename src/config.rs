use std::path::Path;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::ingest::DEFAULT_SKIP_SHEETS;
use crate::report::text::DEFAULT_TOP;

/// Root configuration structure, deserialized from `.haciz-takip/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub report: ReportConfig,
}

/// Which sheets to read and how to split delimited files.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Sheets whose name contains any of these (case-insensitive) are skipped.
    /// Replaces the built-in list when given.
    pub skip_sheets: Vec<String>,
    /// Only read these sheets. Empty means every sheet.
    pub sheets: Vec<String>,
    /// Field delimiter for `.csv` input, a single ASCII character.
    pub delimiter: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            skip_sheets: DEFAULT_SKIP_SHEETS.iter().map(|s| s.to_string()).collect(),
            sheets: Vec::new(),
            delimiter: ",".to_string(),
        }
    }
}

impl IngestConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => bail!(
                "ingest.delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Records listed per tier in the text summary.
    pub top: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top: DEFAULT_TOP }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<working_dir>/.haciz-takip/config.toml`
/// 3. `~/.config/haciz-takip/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let local_config = working_dir.join(".haciz-takip").join("config.toml");
    if local_config.exists() {
        let content = std::fs::read_to_string(&local_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("haciz-takip")
            .join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}
