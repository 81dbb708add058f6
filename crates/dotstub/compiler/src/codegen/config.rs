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


//! Configuration for POSIX stub generation

use super::error::{CodegenError, CodegenResult};

/// Logging expression used when the caller does not supply one
pub const DEFAULT_LOGGING_FUNCTION: &str = "VLOG(1)";

/// Header declaring [`DEFAULT_LOGGING_FUNCTION`]
pub const DEFAULT_LOGGING_INCLUDE: &str = "base/logging.h";

/// Configuration for POSIX stub generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixStubConfig {
    /// Macro placed between return type and name of every stub, e.g. `MEDIA_EXPORT`
    pub export_macro: String,

    /// Streamable logging expression, e.g. `VLOG(1)` or `LOG(ERROR)`
    pub logging_function: String,

    /// Header that declares the logging expression
    pub logging_include: String,

    /// Text inserted verbatim after the implementation's includes
    pub extra_stub_header: Option<String>,
}

impl Default for PosixStubConfig {
    fn default() -> Self {
        Self {
            export_macro: String::new(),
            logging_function: DEFAULT_LOGGING_FUNCTION.to_string(),
            logging_include: DEFAULT_LOGGING_INCLUDE.to_string(),
            extra_stub_header: None,
        }
    }
}

impl PosixStubConfig {
    /// Set the export macro
    pub fn with_export_macro(mut self, export_macro: impl Into<String>) -> Self {
        self.export_macro = export_macro.into();
        self
    }

    /// Set the logging expression and the header declaring it
    pub fn with_logging(mut self, function: impl Into<String>, include: impl Into<String>) -> Self {
        self.logging_function = function.into();
        self.logging_include = include.into();
        self
    }

    /// Set the extra implementation preamble
    pub fn with_extra_stub_header(mut self, text: impl Into<String>) -> Self {
        self.extra_stub_header = Some(text.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> CodegenResult<()> {
        if self.logging_function.trim().is_empty() {
            return Err(CodegenError::Configuration("logging function must not be empty".to_string()));
        }

        if self.logging_include.trim().is_empty() {
            return Err(CodegenError::Configuration("logging include must not be empty".to_string()));
        }

        Ok(())
    }
}
