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


//! Code generation
//!
//! Turns parsed modules into C++ stub sources and Windows definition files.

pub mod config;
pub mod error;
pub mod generator;
pub mod sections;
pub mod writer;

pub use config::{DEFAULT_LOGGING_FUNCTION, DEFAULT_LOGGING_INCLUDE, PosixStubConfig};
pub use error::{CodegenError, CodegenResult};
pub use generator::{GeneratedStubs, GenerationStats, PosixStubGenerator, WindowsDefGenerator};
pub use writer::SourceWriter;
