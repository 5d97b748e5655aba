// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

// Optional config.toml in the platform config dir. Every key has a default.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_APP_ID: &str = "pocketledger";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "£";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Namespaces the remote collections.
    pub app_id: String,
    pub currency_symbol: String,
    pub db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            db_path: None,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.normalized()
    }

    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml(&text, path)
    }

    /// Trim `app_id` and check it can be used as a path segment.
    fn normalized(mut self) -> Result<Self, ConfigError> {
        self.app_id = self.app_id.trim().to_string();
        let app_id = self.app_id.as_str();
        if app_id.is_empty() {
            return Err(ConfigError::Validation {
                field: "app_id".into(),
                message: "must not be empty".into(),
            });
        }
        if app_id.contains('/') {
            return Err(ConfigError::Validation {
                field: "app_id".into(),
                message: "must not contain '/'".into(),
            });
        }
        Ok(self)
    }
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    Ok(crate::db::project_dirs()?.config_dir().join("config.toml"))
}
