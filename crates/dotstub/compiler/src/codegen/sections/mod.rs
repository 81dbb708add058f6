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


//! Typed output fragments
//!
//! Every piece of generated text is a small value implementing [`Render`];
//! the generators only decide which fragments go where and in what order.

pub mod header;
pub mod module;
pub mod stub;
pub mod traits;
pub mod umbrella;
pub mod windows_def;

pub use header::{Block, HeaderCloser, HeaderPreamble, ImplementationPreamble};
pub use module::{LifecycleFunction, LifecycleKind, ModulePrototypes, ModuleStubs};
pub use stub::{PointerDecl, StubBody, StubFunction};
pub use traits::Render;
pub use umbrella::{UmbrellaEnum, UmbrellaInitializer, UmbrellaPrototype};
pub use windows_def::DefFile;
