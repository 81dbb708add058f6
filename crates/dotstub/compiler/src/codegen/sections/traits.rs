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


//! Shared traits for generated source fragments

use crate::codegen::writer::SourceWriter;

/// A typed piece of generated source text
pub trait Render {
    /// Append this fragment's text to the writer
    fn render(&self, out: &mut SourceWriter);

    /// Render into a fresh string, mostly useful for tests
    fn render_to_string(&self) -> String {
        let mut out = SourceWriter::new();
        self.render(&mut out);
        out.into_string()
    }
}
