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


//! DotStub CLI Tool
//!
//! Main entry point for the dotstub command-line interface.

use clap::{Parser, Subcommand};
use dotstub_tools::{CheckArgs, GenerateArgs, GenerationError, run_check, run_generate};
use std::process::ExitCode;
use tracing::{Level, error};

#[derive(Parser)]
#[command(name = "dotstub")]
#[command(about = "DotStub - dlopen/dlsym stub and Windows import library generator")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log every parsed file and emitted module
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate stubs from signature files
    Generate(GenerateArgs),
    /// Parse signature files and report what they contain
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    let result: Result<(), GenerationError> = match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Check(args) => run_check(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.exit_code(), "dotstub failed");
            eprintln!("dotstub: {}", e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
