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


//! Identifier derivation
//!
//! Maps a raw module name onto the family of C identifiers used throughout the
//! generated code. Everything here is a pure function of the module name.

use std::path::Path;

/// Whether `ch` may appear in a C identifier
fn is_ident_char(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// Turn an arbitrary module name into a camel-cased C identifier fragment.
///
/// Characters outside `[_a-zA-Z0-9]` are removed; each run of identifier
/// characters they separated is capitalized: upper-case first letter, the
/// rest lower-cased (`libEGL` gives `Libegl`).
pub fn c_identifier(raw: &str) -> String {
    raw.split(|ch: char| !is_ident_char(ch))
        .filter(|run| !run.is_empty())
        .map(|run| {
            let mut chars = run.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect()
}

/// Enum value naming the module in the umbrella initializer
pub fn enum_name(module: &str) -> String {
    format!("kModule{}", c_identifier(module))
}

/// Function reporting whether every symbol of the module was resolved
pub fn is_initialized_name(module: &str) -> String {
    format!("Is{}Initialized", c_identifier(module))
}

/// Function resolving every symbol of the module from a library handle
pub fn initialize_name(module: &str) -> String {
    format!("Initialize{}", c_identifier(module))
}

/// Function resetting every symbol pointer of the module
pub fn uninitialize_name(module: &str) -> String {
    format!("Uninitialize{}", c_identifier(module))
}

/// All identifiers derived from one module name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdentifiers {
    pub enum_name: String,
    pub is_initialized: String,
    pub initialize: String,
    pub uninitialize: String,
}

impl ModuleIdentifiers {
    pub fn derive(module: &str) -> Self {
        Self {
            enum_name: enum_name(module),
            is_initialized: is_initialized_name(module),
            initialize: initialize_name(module),
            uninitialize: uninitialize_name(module),
        }
    }
}

/// Infer the module name from a signature file path.
///
/// `libavcodec.so.sigs` becomes `libavcodec`: every trailing `.ext` is
/// stripped until none remain.
pub fn extract_module_name(path: &Path) -> String {
    let mut name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    loop {
        let stem = Path::new(&name).file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        if stem == name {
            return name;
        }
        name = stem;
    }
}
