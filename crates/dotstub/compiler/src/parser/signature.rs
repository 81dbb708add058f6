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


//! Single-line regular-expression signature parser

use super::common::{ParseError, ParseResult, Position};
use super::traits::SignatureParser;
use crate::model::{Signature, VARIADIC_PARAM, argument_name};
use regex::Regex;
use std::sync::LazyLock;

/// The pattern is built around the function name: an identifier of at least
/// two characters (`[_a-zA-Z][_a-zA-Z0-9]+`) followed by optional whitespace
/// and an opening parenthesis. Everything before it is the return type and
/// everything up to the first closing parenthesis is the parameter list.
/// Anything after that parenthesis is ignored.
static SIGNATURE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<return_type>.+?)(?P<name>[_a-zA-Z][_a-zA-Z0-9]+)\s*\((?P<params>.*?)\)").expect("signature pattern is valid")
});

/// Parser for files holding one C-style signature per line
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexSignatureParser;

impl RegexSignatureParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Whether a trimmed line carries no signature
    fn is_skippable(line: &str) -> bool {
        line.is_empty() || line.starts_with('#') || line.starts_with("//")
    }

    /// Reject parameter lists the stub emitter cannot forward
    fn check_params(params: &[String], line: &str, position: Position) -> ParseResult<()> {
        if params.len() > 1 && params.iter().any(|p| p.is_empty()) {
            return Err(ParseError::unsupported_signature(position, line, "empty parameter"));
        }

        let names: Vec<String> = params.iter().map(|p| argument_name(p)).collect();
        if names.iter().any(|n| n.ends_with(VARIADIC_PARAM) && n != VARIADIC_PARAM) {
            return Err(ParseError::unsupported_signature(position, line, "'...' must be a parameter of its own"));
        }

        match names.iter().position(|n| n == VARIADIC_PARAM) {
            Some(index) if index + 1 != params.len() => Err(ParseError::unsupported_signature(position, line, "'...' must be the last parameter")),
            Some(0) => Err(ParseError::unsupported_signature(position, line, "'...' needs a named parameter before it")),
            _ => Ok(()),
        }
    }
}

impl SignatureParser for RegexSignatureParser {
    fn parse_line(&self, line: &str, position: Position) -> ParseResult<Option<Signature>> {
        let line = line.trim();
        if Self::is_skippable(line) {
            return Ok(None);
        }

        let captures = SIGNATURE_REGEX.captures(line).ok_or_else(|| ParseError::bad_signature(position, line))?;
        let return_type = captures.name("return_type").map_or("", |m| m.as_str()).trim();
        let name = captures.name("name").map_or("", |m| m.as_str()).trim();
        let params: Vec<String> = captures.name("params").map_or("", |m| m.as_str()).split(',').map(|p| p.trim().to_string()).collect();

        Self::check_params(&params, line, position)?;

        Ok(Some(Signature::new(return_type, name, params)))
    }
}
