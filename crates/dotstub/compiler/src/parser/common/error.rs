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


//! Parser error types and handling

use super::Position;
use std::fmt;
use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Error raised while reading a signature file
#[derive(Error, Debug, Clone)]
pub struct ParseError {
    /// The kind of error
    pub kind: ParseErrorKind,
    /// Position where the error occurred
    pub position: Position,
    /// Human-readable error message
    pub message: String,
    /// Additional context, usually the file being parsed
    pub context: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ParseErrorKind, position: Position, message: String) -> Self {
        Self { kind, position, message, context: None }
    }

    /// Create an error with context
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }

    /// A line that does not look like a C function signature
    pub fn bad_signature(position: Position, line: &str) -> Self {
        Self::new(ParseErrorKind::BadSignature, position, format!("Unparsable line: {}", line))
    }

    /// A line that matched the signature pattern but cannot be stubbed
    pub fn unsupported_signature(position: Position, line: &str, reason: &str) -> Self {
        Self::new(ParseErrorKind::BadSignature, position, format!("Unsupported signature ({}): {}", reason, line))
    }

    /// The signature source could not be read
    pub fn io(message: String) -> Self {
        Self::new(ParseErrorKind::Io, Position::unknown(), message)
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        let location = match &self.context {
            Some(file) if self.position.is_valid() => format!("{}:{}", file, self.position.line),
            Some(file) => file.clone(),
            None if self.position.is_valid() => format!("line {}", self.position.line),
            None => "input".to_string(),
        };
        format!("{} at {}: {}", self.kind, location, self.message)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

/// Categories of parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A non-comment line that is not a supported signature
    #[error("Bad signature")]
    BadSignature,

    /// Reading the signature source failed
    #[error("I/O error")]
    Io,
}
