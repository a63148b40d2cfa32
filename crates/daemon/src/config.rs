// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal config file loader (SPEC_FULL "Configuration"). `Config`
//! itself already derives `Deserialize` with `serde(default = ...)`
//! filling every optional field, so loading is just "read the file,
//! parse it, validate it" -- no separate raw/typed split is needed.

use mover_status_core::{Config, ConfigError};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "./mover-status.toml";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: String, source: Box<toml::de::Error> },
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Reads, parses, and validates a config file in one step.
pub fn load(path: &Path) -> Result<Config, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Read { path: path.display().to_string(), source })?;
    let config: Config = toml::from_str(&contents).map_err(|source| LoadError::Parse { path: path.display().to_string(), source: Box::new(source) })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
