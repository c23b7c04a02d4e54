use std::fs;
use std::path::Path;

use l10n_check_core::Encoding;
use serde::Deserialize;

use crate::error::CliError;

pub const DEFAULT_CONFIG_PATH: &str = "l10n-check.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub encoding: String,
    pub same_values: bool,
    pub no_warnings: bool,
    pub verbose: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::default().as_str().to_string(),
            same_values: false,
            no_warnings: false,
            verbose: false,
        }
    }
}

impl CheckConfig {
    pub fn encoding(&self) -> Result<Encoding, CliError> {
        self.encoding
            .parse()
            .map_err(|_| CliError::InvalidConfig(format!("unknown encoding '{}'", self.encoding)))
    }
}

pub fn load_config(path: &Path) -> Result<CheckConfig, CliError> {
    let contents = fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

pub fn load_config_or_default(path: &Path) -> Result<CheckConfig, CliError> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading config");
        load_config(path)
    } else {
        Ok(CheckConfig::default())
    }
}
