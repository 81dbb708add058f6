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


//! DotStub Compiler
//!
//! Turns files of C-style function signatures into dynamic-symbol-resolution
//! shims. For POSIX targets the output is a C++ header plus implementation
//! whose stub functions forward to pointers filled in through `dlsym` once the
//! backing library has been opened with `dlopen`. For Windows targets the
//! output is a module-definition file listing the exported names.
//!
//! # Pipeline
//!
//! - [`parser`]: one signature per line into [`model::Signature`]
//! - [`ident`]: module names into the C identifiers used by generated code
//! - [`codegen`]: typed fragments rendered into header and implementation text
//!
//! # Example
//!
//! ```rust
//! use dotstub_compiler::codegen::{PosixStubConfig, PosixStubGenerator};
//! use dotstub_compiler::model::{GenerationUnit, StubModule};
//! use dotstub_compiler::parser::{RegexSignatureParser, SignatureParser};
//!
//! let parser = RegexSignatureParser::new();
//! let signatures = parser.parse_source("int avcodec_open(void* ctx)\n").unwrap();
//! let unit = GenerationUnit::new(vec![StubModule::new("avcodec", signatures)], "third_party/ffmpeg", "ffmpeg_stubs");
//!
//! let generated = PosixStubGenerator::new(PosixStubConfig::default()).generate(&unit).unwrap();
//! assert!(generated.header.contains("bool IsAvcodecInitialized();"));
//! assert!(generated.implementation.contains("return avcodec_open_ptr(ctx);"));
//! ```

pub mod codegen;
pub mod ident;
pub mod model;
pub mod parser;

pub use codegen::{CodegenError, CodegenResult, GeneratedStubs, PosixStubConfig, PosixStubGenerator, WindowsDefGenerator};
pub use model::{GenerationUnit, Signature, StubModule};
pub use parser::{ParseError, ParseErrorKind, ParseResult, RegexSignatureParser, SignatureParser};
