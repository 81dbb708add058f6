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


//! File preambles, closers and block delimiters

use super::traits::Render;
use crate::codegen::writer::SourceWriter;

const GENERATED_BANNER: &str = "This is generated file. Do not modify directly.";

/// Banner, include guard, standard includes and the namespace opening
#[derive(Debug, Clone, Copy)]
pub struct HeaderPreamble<'a> {
    pub guard: &'a str,
    pub namespace: &'a str,
    pub logging_include: &'a str,
}

impl Render for HeaderPreamble<'_> {
    fn render(&self, out: &mut SourceWriter) {
        out.comment(GENERATED_BANNER);
        out.blank_line();
        out.line(format!("#ifndef {}", self.guard));
        out.line(format!("#define {}", self.guard));
        out.blank_line();
        for system in ["stdarg.h", "map", "string", "vector"] {
            out.line(format!("#include <{}>", system));
        }
        out.blank_line();
        out.line(format!("#include \"{}\"", self.logging_include));
        out.blank_line();
        out.line(format!("namespace {} {{", self.namespace));
        out.comment("Individual module initializer functions.");
    }
}

/// Namespace and include guard closing
#[derive(Debug, Clone, Copy)]
pub struct HeaderCloser<'a> {
    pub guard: &'a str,
    pub namespace: &'a str,
}

impl Render for HeaderCloser<'_> {
    fn render(&self, out: &mut SourceWriter) {
        out.line(format!("}}  // namespace {}", self.namespace));
        out.blank_line();
        out.line(format!("#endif  // {}", self.guard));
    }
}

/// Banner and includes of the implementation, plus the verbatim extra header
#[derive(Debug, Clone, Copy)]
pub struct ImplementationPreamble<'a> {
    pub header_include_path: &'a str,
    pub extra_stub_header: Option<&'a str>,
}

impl Render for ImplementationPreamble<'_> {
    fn render(&self, out: &mut SourceWriter) {
        out.comment(GENERATED_BANNER);
        out.blank_line();
        out.line(format!("#include \"{}\"", self.header_include_path));
        out.blank_line();
        out.line("#include <stdlib.h>  // For NULL.");
        out.line("#include <dlfcn.h>   // For dlsym, dlopen.");
        out.blank_line();
        out.line("#include <map>");
        out.line("#include <vector>");
        out.blank_line();
        out.line("#include \"base/compiler_specific.h\"");

        if let Some(extra) = self.extra_stub_header {
            out.newline();
            out.write(extra);
            out.newline();
        }
    }
}

/// Opening or closing of a block wrapping implementation sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    ExternCOpen,
    ExternCClose,
    NamespaceOpen(&'a str),
    NamespaceClose(&'a str),
}

impl Render for Block<'_> {
    fn render(&self, out: &mut SourceWriter) {
        match self {
            Block::ExternCOpen => {
                out.line("extern \"C\" {");
                out.blank_line();
            }
            Block::ExternCClose => {
                out.blank_line();
                out.line("}  // extern \"C\"");
                out.blank_line();
                out.blank_line();
            }
            Block::NamespaceOpen(namespace) => {
                out.line(format!("namespace {} {{", namespace));
                out.blank_line();
            }
            Block::NamespaceClose(namespace) => {
                out.blank_line();
                out.line(format!("}}  // namespace {}", namespace));
            }
        }
    }
}
