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


//! Signature parsing
//!
//! Signature files hold one C-style declaration per line, without the
//! trailing semicolon:
//!
//! ```text
//! # libavcodec entry points
//! int avcodec_open2(AVCodecContext* avctx, const AVCodec* codec, AVDictionary** options)
//! void av_log(void* avcl, int level, const char* fmt, ...)
//! ```
//!
//! Blank lines and lines starting with `#` or `//` are ignored. Any other line
//! that does not parse aborts the whole file with a
//! [`ParseErrorKind::BadSignature`] error.

pub mod common;
pub mod signature;
pub mod traits;

pub use common::{ParseError, ParseErrorKind, ParseResult, Position};
pub use signature::RegexSignatureParser;
pub use traits::SignatureParser;
