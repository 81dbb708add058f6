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


//! Parser traits for signature sources

use super::common::{ParseError, ParseResult, Position};
use crate::model::Signature;
use std::fs;
use std::path::Path;

/// Turns signature text into [`Signature`] records.
///
/// Only [`SignatureParser::parse_line`] is grammar specific. A parser for a
/// richer grammar (multi-line declarations, for instance) can override
/// [`SignatureParser::parse_source`] without the emitters noticing.
pub trait SignatureParser {
    /// Parse one line. Blank and comment lines yield `Ok(None)`.
    fn parse_line(&self, line: &str, position: Position) -> ParseResult<Option<Signature>>;

    /// Parse a whole source, stopping at the first malformed line
    fn parse_source(&self, source: &str) -> ParseResult<Vec<Signature>> {
        let mut signatures = Vec::new();
        let mut position = Position::start();
        for line in source.lines() {
            if let Some(signature) = self.parse_line(line, position)? {
                signatures.push(signature);
            }
            position.next_line();
        }
        Ok(signatures)
    }

    /// Read and parse a signature file; errors carry the file path as context
    fn parse_file(&self, path: &Path) -> ParseResult<Vec<Signature>> {
        let display = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|e| ParseError::io(format!("cannot read signature file: {}", e)).with_context(display.clone()))?;
        self.parse_source(&source).map_err(|e| e.with_context(display))
    }
}
