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


//! Windows import library creation through the `lib` tool

use super::generate::GenerationError;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Progress line `lib` prints for every library it creates
pub const CREATING_LIBRARY_PREFIX: &str = "   Creating library";

/// Target machine passed to `lib /machine:`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Machine {
    X86,
    X64,
}

impl Machine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Machine::X86 => "X86",
            Machine::X64 => "X64",
        }
    }
}

/// Drop the lines `lib` prints on success, keep everything else
pub fn filter_tool_output(stdout: &str) -> String {
    stdout.lines().filter(|line| !line.starts_with(CREATING_LIBRARY_PREFIX)).map(|line| format!("{}\n", line)).collect()
}

/// Invocation of the `lib` program
#[derive(Debug, Clone)]
pub struct LibTool {
    program: String,
}

impl LibTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    /// `lib /nologo /machine:<M> /def:<def> /out:<lib>`
    pub fn command(&self, machine: Machine, def_path: &Path, lib_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("/nologo")
            .arg(format!("/machine:{}", machine.as_str()))
            .arg(format!("/def:{}", def_path.display()))
            .arg(format!("/out:{}", lib_path.display()));
        cmd
    }

    /// Build `lib_path` from `def_path`, forwarding the tool's filtered stdout
    pub fn run(&self, machine: Machine, def_path: &Path, lib_path: &Path) -> Result<(), GenerationError> {
        debug!(program = %self.program, machine = machine.as_str(), def = %def_path.display(), "running lib tool");

        let output = self.command(machine, def_path, lib_path).output().map_err(|e| GenerationError::Subprocess {
            message: format!("Failed to run {}: {}", self.program, e),
            code: 1,
        })?;

        let forwarded = filter_tool_output(&String::from_utf8_lossy(&output.stdout));
        if !forwarded.is_empty() {
            std::io::stdout().write_all(forwarded.as_bytes()).map_err(|e| GenerationError::FileSystem(format!("Cannot forward {} output: {}", self.program, e)))?;
        }

        if !output.status.success() {
            return Err(GenerationError::Subprocess {
                message: format!("Failed creating {} for {}", lib_path.display(), def_path.display()),
                code: output.status.code().unwrap_or(1),
            });
        }

        info!(path = %lib_path.display(), "wrote import library");
        Ok(())
    }
}
