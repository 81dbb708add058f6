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


//! `dotstub check`: parse signature files without generating anything

use super::generate::GenerationError;
use clap::Parser;
use dotstub_compiler::ident::{ModuleIdentifiers, extract_module_name};
use dotstub_compiler::parser::{RegexSignatureParser, SignatureParser};
use std::path::PathBuf;
use tracing::warn;

/// CLI arguments for validation
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Signature files to validate
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Per-module outcome of a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    pub module: String,
    pub enum_name: String,
    pub signatures: usize,
}

/// Parse every input, stopping at the first malformed file
pub fn check_inputs(args: &CheckArgs) -> Result<Vec<ModuleSummary>, GenerationError> {
    let parser = RegexSignatureParser::new();
    let mut summaries: Vec<ModuleSummary> = Vec::with_capacity(args.inputs.len());

    for input in &args.inputs {
        let signatures = parser.parse_file(input)?;
        let module = extract_module_name(input);
        let enum_name = ModuleIdentifiers::derive(&module).enum_name;

        if let Some(previous) = summaries.iter().find(|s| s.enum_name == enum_name) {
            warn!(first = %previous.module, second = %module, identifier = %enum_name, "modules derive the same C identifier");
        }
        summaries.push(ModuleSummary {
            module,
            enum_name,
            signatures: signatures.len(),
        });
    }
    Ok(summaries)
}

/// Main entry point for the check command
pub fn run_check(args: CheckArgs) -> Result<(), GenerationError> {
    for summary in check_inputs(&args)? {
        println!("{}: {} signatures ({})", summary.module, summary.signatures, summary.enum_name);
    }
    Ok(())
}
