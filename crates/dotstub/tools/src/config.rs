// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.


//! Optional TOML defaults for `dotstub generate`
//!
//! ```toml
//! export_macro = "MEDIA_EXPORT"
//! logging_function = "DVLOG(1)"
//! logging_include = "base/logging.h"
//! lib_tool = "lib.exe"
//! ```
//!
//! Missing keys keep their defaults; explicit command-line flags win over
//! anything loaded here.

use crate::cli::generate::GenerationError;
use dotstub_compiler::codegen::{DEFAULT_LOGGING_FUNCTION, DEFAULT_LOGGING_INCLUDE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable naming a config file when `--config` is absent
pub const CONFIG_ENV_VAR: &str = "DOTSTUB_CONFIG";

/// Program used to build Windows import libraries
pub const DEFAULT_LIB_TOOL: &str = "lib";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotStubConfig {
    pub export_macro: String,
    pub logging_function: String,
    pub logging_include: String,
    pub lib_tool: String,
}

impl Default for DotStubConfig {
    fn default() -> Self {
        Self {
            export_macro: String::new(),
            logging_function: DEFAULT_LOGGING_FUNCTION.to_string(),
            logging_include: DEFAULT_LOGGING_INCLUDE.to_string(),
            lib_tool: DEFAULT_LIB_TOOL.to_string(),
        }
    }
}

impl DotStubConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, GenerationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GenerationError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&content).map_err(|e| GenerationError::Config(format!("invalid {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// `--config` first, then `DOTSTUB_CONFIG`, then built-in defaults
    pub fn resolve_config(cli_config: Option<&Path>) -> Result<Self, GenerationError> {
        if let Some(config_path) = cli_config {
            Self::load_from_file(config_path)
        } else if let Some(env_config) = std::env::var_os(CONFIG_ENV_VAR) {
            Self::load_from_file(env_config)
        } else {
            Ok(Self::default())
        }
    }
}
