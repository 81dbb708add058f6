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


//! In-memory model of one generation run
//!
//! A run is a [`GenerationUnit`] holding one [`StubModule`] per signature
//! file. Everything here is built fresh per run and dropped once the output
//! text has been rendered.

use crate::ident::ModuleIdentifiers;
use std::collections::HashMap;
use tracing::warn;

/// Parameter standing for a C variadic tail
pub const VARIADIC_PARAM: &str = "...";

/// Bare argument name of a parameter declaration.
///
/// `const char* fmt` gives `fmt`, `int& out` gives `out` and `char buf[]`
/// gives `buf`: array parameters decay to pointers and are forwarded by name.
pub fn argument_name(param: &str) -> String {
    let name = param.rsplit(|ch: char| matches!(ch, '*' | '&' | ' ')).next().unwrap_or(param).trim();
    name.strip_suffix("[]").unwrap_or(name).to_string()
}

/// One parsed C function declaration
#[derive(Debug, Clone, Eq)]
pub struct Signature {
    /// Raw return type text, trimmed
    pub return_type: String,
    /// C identifier of the function
    pub name: String,
    /// Raw parameter declarations, each trimmed
    pub params: Vec<String>,
    /// Visibility macro placed between return type and name; set by the emitter
    pub export_macro: Option<String>,
}

impl Signature {
    /// Create a signature without an export annotation
    pub fn new(return_type: impl Into<String>, name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            return_type: return_type.into(),
            name: name.into(),
            params,
            export_macro: None,
        }
    }

    /// Copy of this signature annotated with the given export macro
    pub fn with_export(&self, export_macro: &str) -> Self {
        let mut annotated = self.clone();
        annotated.export_macro = if export_macro.is_empty() { None } else { Some(export_macro.to_string()) };
        annotated
    }

    /// Parameter declarations joined the way they appear in C
    pub fn joined_params(&self) -> String {
        self.params.join(", ")
    }

    /// Argument names of every parameter, in order
    pub fn argument_names(&self) -> Vec<String> {
        self.params.iter().map(|p| argument_name(p)).collect()
    }

    /// Whether the function returns nothing
    pub fn returns_void(&self) -> bool {
        self.return_type == "void"
    }

    /// Name of the file-scope pointer holding the resolved symbol
    pub fn pointer_name(&self) -> String {
        format!("{}_ptr", self.name)
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.return_type == other.return_type && self.name == other.name && self.params == other.params
    }
}

/// The signatures of one input file, loaded and initialized as a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubModule {
    /// Module name, the input base name without extensions
    pub name: String,
    /// Signatures in file order
    pub signatures: Vec<Signature>,
}

impl StubModule {
    /// Create a module
    pub fn new(name: impl Into<String>, signatures: Vec<Signature>) -> Self {
        Self { name: name.into(), signatures }
    }

    /// C identifiers derived from the module name
    pub fn identifiers(&self) -> ModuleIdentifiers {
        ModuleIdentifiers::derive(&self.name)
    }

    /// Signature names that appear more than once in this module
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for signature in &self.signatures {
            let count = seen.entry(signature.name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(signature.name.as_str());
            }
        }
        duplicates
    }
}

/// Everything needed to render one POSIX stub header/implementation pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationUnit {
    /// Modules in input order; this is the enum order and the load order
    pub modules: Vec<StubModule>,
    /// C++ namespace of the lifecycle functions and umbrella loader
    pub namespace: String,
    /// Header guard macro
    pub header_guard: String,
    /// Path used by the implementation to include its header
    pub header_include_path: String,
}

impl GenerationUnit {
    /// Build a unit from the logical source path (e.g. `third_party/ffmpeg`)
    /// and the stub file base name
    pub fn new(modules: Vec<StubModule>, path_from_source: &str, stub_name: &str) -> Self {
        let namespace = Self::namespace_for(path_from_source);
        let header_guard = format!("{}_", namespace.to_uppercase());
        let header_include_path = if path_from_source.is_empty() {
            format!("{}.h", stub_name)
        } else {
            format!("{}/{}.h", path_from_source.trim_end_matches('/'), stub_name)
        };

        Self {
            modules,
            namespace,
            header_guard,
            header_include_path,
        }
    }

    /// Namespace derived from a logical source path
    pub fn namespace_for(path_from_source: &str) -> String {
        path_from_source.replace('/', "_").to_lowercase()
    }

    /// Every signature of every module, in module then file order
    pub fn all_signatures(&self) -> impl Iterator<Item = &Signature> {
        self.modules.iter().flat_map(|module| module.signatures.iter())
    }

    /// Log modules whose derived identifiers collide and repeated signature names.
    ///
    /// Neither is rejected: both produce generated code that fails to compile,
    /// which is the caller's problem to fix in the inputs.
    pub fn warn_on_collisions(&self) {
        let mut by_identifier: HashMap<String, &str> = HashMap::new();
        for module in &self.modules {
            let identifiers = module.identifiers();
            if let Some(previous) = by_identifier.insert(identifiers.enum_name.clone(), &module.name) {
                warn!(first = previous, second = %module.name, identifier = %identifiers.enum_name, "modules derive the same C identifier");
            }
            for name in module.duplicate_names() {
                warn!(module = %module.name, signature = name, "signature declared more than once");
            }
        }
    }
}
