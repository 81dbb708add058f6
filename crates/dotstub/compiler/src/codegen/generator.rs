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


//! Stub generators
//!
//! The POSIX generator turns a [`GenerationUnit`] into the text of a header
//! and an implementation; the Windows generator turns signatures into a
//! module-definition file. Both work purely in memory, so a caller can
//! render everything before touching the filesystem.

use super::config::PosixStubConfig;
use super::error::{CodegenError, CodegenResult};
use super::sections::{Block, DefFile, HeaderCloser, HeaderPreamble, ImplementationPreamble, LifecycleFunction, LifecycleKind, ModulePrototypes, ModuleStubs, Render, UmbrellaEnum, UmbrellaInitializer, UmbrellaPrototype};
use super::writer::SourceWriter;
use crate::model::{GenerationUnit, Signature};
use tracing::debug;

/// Rough bytes of output per signature, used to pre-size buffers
const BYTES_PER_SIGNATURE: usize = 512;

/// Generation statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub modules: usize,
    pub signatures: usize,
    pub header_lines: usize,
    pub implementation_lines: usize,
}

/// Header and implementation text for one generation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStubs {
    pub header: String,
    pub implementation: String,
    pub stats: GenerationStats,
}

/// Generator for the POSIX `dlopen`/`dlsym` stub pair
#[derive(Debug, Clone, Default)]
pub struct PosixStubGenerator {
    config: PosixStubConfig,
}

impl PosixStubGenerator {
    pub fn new(config: PosixStubConfig) -> Self {
        Self { config }
    }

    /// Render the header and implementation of `unit`
    pub fn generate(&self, unit: &GenerationUnit) -> CodegenResult<GeneratedStubs> {
        self.config.validate()?;
        if unit.modules.is_empty() {
            return Err(CodegenError::NoModules);
        }
        unit.warn_on_collisions();

        let signatures = unit.all_signatures().count();
        let implementation = self.render_implementation(unit, signatures);
        let header = self.render_header(unit);

        let stats = GenerationStats {
            modules: unit.modules.len(),
            signatures,
            header_lines: header.line_count(),
            implementation_lines: implementation.line_count(),
        };
        debug!(namespace = %unit.namespace, modules = stats.modules, signatures = stats.signatures, "generated posix stubs");

        Ok(GeneratedStubs {
            header: header.into_string(),
            implementation: implementation.into_string(),
            stats,
        })
    }

    fn render_implementation(&self, unit: &GenerationUnit, signatures: usize) -> SourceWriter {
        let mut out = SourceWriter::with_capacity(signatures.max(1) * BYTES_PER_SIGNATURE);
        let logging = self.config.logging_function.as_str();

        ImplementationPreamble {
            header_include_path: &unit.header_include_path,
            extra_stub_header: self.config.extra_stub_header.as_deref(),
        }
        .render(&mut out);

        Block::ExternCOpen.render(&mut out);
        for module in &unit.modules {
            debug!(module = %module.name, signatures = module.signatures.len(), "emitting module stubs");
            ModuleStubs::new(module, &self.config.export_macro).render(&mut out);
        }
        Block::ExternCClose.render(&mut out);

        Block::NamespaceOpen(&unit.namespace).render(&mut out);
        for module in &unit.modules {
            for kind in LifecycleKind::ALL {
                LifecycleFunction::new(kind, module, logging).render(&mut out);
            }
        }
        UmbrellaInitializer::new(&unit.modules, logging).render(&mut out);
        Block::NamespaceClose(&unit.namespace).render(&mut out);

        out
    }

    fn render_header(&self, unit: &GenerationUnit) -> SourceWriter {
        let mut out = SourceWriter::new();

        HeaderPreamble {
            guard: &unit.header_guard,
            namespace: &unit.namespace,
            logging_include: &self.config.logging_include,
        }
        .render(&mut out);
        for module in &unit.modules {
            ModulePrototypes::new(module).render(&mut out);
        }
        UmbrellaEnum::new(&unit.modules).render(&mut out);
        UmbrellaPrototype.render(&mut out);
        HeaderCloser {
            guard: &unit.header_guard,
            namespace: &unit.namespace,
        }
        .render(&mut out);

        out
    }
}

/// Generator for Windows module-definition files
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsDefGenerator;

impl WindowsDefGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Render a `.def` file exporting every signature under `library`
    pub fn generate<'a, I>(&self, library: &'a str, signatures: I) -> String
    where
        I: IntoIterator<Item = &'a Signature>,
    {
        let def = DefFile::new(library, signatures);
        debug!(library, exports = def.export_count(), "generated module definition");
        def.render_to_string()
    }
}
