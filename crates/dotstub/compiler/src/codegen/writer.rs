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


//! Text writer for generated C and C++ sources

/// Accumulates generated source text line by line
#[derive(Debug, Clone, Default)]
pub struct SourceWriter {
    buffer: String,
    lines: usize,
}

impl SourceWriter {
    /// Create a new source writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
            lines: 0,
        }
    }

    /// Write raw text; newlines inside it are counted
    pub fn write(&mut self, text: &str) {
        self.lines += text.matches('\n').count();
        self.buffer.push_str(text);
    }

    /// Write one line of text followed by a newline
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.write(text.as_ref());
        self.newline();
    }

    /// Write a line made of a comment marker and the given text
    pub fn comment(&mut self, text: impl AsRef<str>) {
        self.line(format!("// {}", text.as_ref()));
    }

    /// Terminate the current line
    pub fn newline(&mut self) {
        self.buffer.push('\n');
        self.lines += 1;
    }

    /// Write an empty line
    pub fn blank_line(&mut self) {
        self.newline();
    }

    /// Number of newlines written so far
    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Get the current length of the buffer in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the current buffer contents without consuming
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Take ownership of the generated text
    pub fn into_string(self) -> String {
        self.buffer
    }
}
