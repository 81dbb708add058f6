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


//! Windows module-definition file

use super::traits::Render;
use crate::codegen::writer::SourceWriter;
use crate::model::Signature;

/// `LIBRARY` line, `EXPORTS` line, then one exported name per signature
#[derive(Debug, Clone)]
pub struct DefFile<'a> {
    library: &'a str,
    exports: Vec<&'a str>,
}

impl<'a> DefFile<'a> {
    pub fn new<I>(library: &'a str, signatures: I) -> Self
    where
        I: IntoIterator<Item = &'a Signature>,
    {
        Self {
            library,
            exports: signatures.into_iter().map(|s| s.name.as_str()).collect(),
        }
    }

    pub fn export_count(&self) -> usize {
        self.exports.len()
    }
}

impl Render for DefFile<'_> {
    fn render(&self, out: &mut SourceWriter) {
        out.line(format!("LIBRARY {}", self.library));
        out.line("EXPORTS");
        for name in &self.exports {
            out.line(format!("  {}", name));
        }
    }
}
