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


//! `dotstub generate`: signature files in, stub sources or Windows artifacts out
//!
//! Every input is parsed and every artifact rendered before the first file
//! is written, so a malformed signature file leaves the output directories
//! untouched.

use super::windows::{LibTool, Machine};
use crate::config::DotStubConfig;
use clap::{Parser, ValueEnum};
use dotstub_compiler::codegen::{CodegenError, PosixStubConfig, PosixStubGenerator, WindowsDefGenerator};
use dotstub_compiler::ident::extract_module_name;
use dotstub_compiler::model::{GenerationUnit, StubModule};
use dotstub_compiler::parser::{ParseError, RegexSignatureParser, SignatureParser};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI arguments for stub generation
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Signature files; each one becomes a module
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output location for generated headers and libraries
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Location for intermediate files (implementation, .def); defaults to the output directory
    #[arg(short = 'i', long)]
    pub intermediate_dir: Option<PathBuf>,

    /// Type of file to generate
    #[arg(short = 't', long = "type", value_enum)]
    pub stub_type: StubType,

    /// Base name of the generated header and implementation (posix_stubs)
    #[arg(short = 's', long)]
    pub stubfile_name: Option<String>,

    /// Path of the generated files relative to the source root (posix_stubs)
    #[arg(short = 'p', long)]
    pub path_from_source: Option<String>,

    /// File whose contents are inserted after the implementation's includes
    #[arg(short = 'e', long)]
    pub extra_stub_header: Option<PathBuf>,

    /// Name of the DLL or LIB that links in the def file (windows_def)
    #[arg(short = 'm', long)]
    pub module_name: Option<String>,

    /// Macro placed in front of every stub definition, e.g. MEDIA_EXPORT
    #[arg(short = 'x', long)]
    pub export_macro: Option<String>,

    /// Streamable logging expression used by generated code, e.g. "LOG(ERROR)"
    #[arg(short = 'l', long)]
    pub logging_function: Option<String>,

    /// Header declaring the logging expression
    #[arg(short = 'n', long)]
    pub logging_include: Option<String>,

    /// Program invoked to build Windows import libraries
    #[arg(long)]
    pub lib_tool: Option<String>,

    /// TOML file with defaults for the options above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Artifact kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StubType {
    /// C++ header and implementation resolving symbols with dlopen/dlsym
    #[value(name = "posix_stubs")]
    PosixStubs,
    /// One X86 import library per signature file
    #[value(name = "windows_lib")]
    WindowsLib,
    /// One X64 import library per signature file
    #[value(name = "windows_lib_x64")]
    WindowsLibX64,
    /// A single module-definition file for all signature files
    #[value(name = "windows_def")]
    WindowsDef,
}

/// Generation errors
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Code generation failed: {0}")]
    Codegen(#[from] CodegenError),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{message} (exit code {code})")]
    Subprocess { message: String, code: i32 },
}

impl GenerationError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerationError::Subprocess { code, .. } => *code,
            _ => 1,
        }
    }
}

/// A file fully rendered in memory, waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFile {
    path: PathBuf,
    contents: String,
}

/// Main generation pipeline
pub struct GenerationPipeline {
    args: GenerateArgs,
    config: DotStubConfig,
}

impl GenerationPipeline {
    /// Create a pipeline, resolving the configuration file
    pub fn new(args: GenerateArgs) -> Result<Self, GenerationError> {
        let config = DotStubConfig::resolve_config(args.config.as_deref())?;
        Ok(Self::with_config(args, config))
    }

    /// Create a pipeline with an already resolved configuration
    pub fn with_config(args: GenerateArgs, config: DotStubConfig) -> Self {
        Self { args, config }
    }

    /// Check the option combinations required by the selected type
    pub fn validate(&self) -> Result<(), GenerationError> {
        match self.args.stub_type {
            StubType::PosixStubs => {
                if self.args.stubfile_name.as_deref().is_none_or(str::is_empty) {
                    return Err(GenerationError::InvalidOptions("posix_stubs requires --stubfile-name".to_string()));
                }
                if self.args.path_from_source.is_none() {
                    return Err(GenerationError::InvalidOptions("posix_stubs requires --path-from-source".to_string()));
                }
            }
            StubType::WindowsDef => {
                if self.args.module_name.as_deref().is_none_or(str::is_empty) {
                    return Err(GenerationError::InvalidOptions("windows_def requires --module-name".to_string()));
                }
            }
            StubType::WindowsLib | StubType::WindowsLibX64 => {}
        }
        Ok(())
    }

    /// Directory for intermediate artifacts
    pub fn intermediate_dir(&self) -> &Path {
        self.args.intermediate_dir.as_deref().unwrap_or(&self.args.output)
    }

    /// Run the pipeline, returning the paths of every file produced
    pub fn execute(&self) -> Result<Vec<PathBuf>, GenerationError> {
        self.validate()?;
        debug!(stub_type = ?self.args.stub_type, inputs = self.args.inputs.len(), output = %self.args.output.display(), "starting generation");

        let modules = self.parse_modules()?;
        match self.args.stub_type {
            StubType::PosixStubs => {
                let pending = self.render_posix(modules)?;
                self.create_output_directories()?;
                self.write_pending(&pending)
            }
            StubType::WindowsDef => {
                let pending = self.render_windows_def(&modules)?;
                self.create_output_directories()?;
                self.write_pending(&pending)
            }
            StubType::WindowsLib => self.create_windows_libs(&modules, Machine::X86),
            StubType::WindowsLibX64 => self.create_windows_libs(&modules, Machine::X64),
        }
    }

    fn parse_modules(&self) -> Result<Vec<StubModule>, GenerationError> {
        let parser = RegexSignatureParser::new();
        let mut modules = Vec::with_capacity(self.args.inputs.len());
        for input in &self.args.inputs {
            let signatures = parser.parse_file(input)?;
            let module = StubModule::new(extract_module_name(input), signatures);
            debug!(file = %input.display(), module = %module.name, signatures = module.signatures.len(), "parsed signature file");
            modules.push(module);
        }
        Ok(modules)
    }

    fn posix_config(&self) -> Result<PosixStubConfig, GenerationError> {
        let args = &self.args;
        let export_macro = args.export_macro.clone().unwrap_or_else(|| self.config.export_macro.clone());
        let logging_function = args.logging_function.clone().unwrap_or_else(|| self.config.logging_function.clone());
        let logging_include = args.logging_include.clone().unwrap_or_else(|| self.config.logging_include.clone());

        let mut config = PosixStubConfig::default().with_export_macro(export_macro).with_logging(logging_function, logging_include);
        if let Some(path) = &args.extra_stub_header {
            let text = fs::read_to_string(path).map_err(|e| GenerationError::FileSystem(format!("Cannot read extra stub header {}: {}", path.display(), e)))?;
            config = config.with_extra_stub_header(text);
        }
        Ok(config)
    }

    fn render_posix(&self, modules: Vec<StubModule>) -> Result<Vec<PendingFile>, GenerationError> {
        let stub_name = self.args.stubfile_name.as_deref().unwrap_or_default();
        let path_from_source = self.args.path_from_source.as_deref().unwrap_or_default();

        let unit = GenerationUnit::new(modules, path_from_source, stub_name);
        let generated = PosixStubGenerator::new(self.posix_config()?).generate(&unit)?;

        Ok(vec![
            PendingFile {
                path: self.intermediate_dir().join(format!("{}.cc", stub_name)),
                contents: generated.implementation,
            },
            PendingFile {
                path: self.args.output.join(format!("{}.h", stub_name)),
                contents: generated.header,
            },
        ])
    }

    fn render_windows_def(&self, modules: &[StubModule]) -> Result<Vec<PendingFile>, GenerationError> {
        let module_name = self.args.module_name.as_deref().unwrap_or_default();
        let stem = Path::new(module_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| GenerationError::InvalidOptions(format!("Cannot derive a file name from module name {}", module_name)))?;

        let contents = WindowsDefGenerator::new().generate(module_name, modules.iter().flat_map(|m| m.signatures.iter()));
        Ok(vec![PendingFile {
            path: self.args.output.join(format!("{}.def", stem)),
            contents,
        }])
    }

    /// One `.def` in the intermediate directory and one `.lib` in the output directory per module
    fn create_windows_libs(&self, modules: &[StubModule], machine: Machine) -> Result<Vec<PathBuf>, GenerationError> {
        let generator = WindowsDefGenerator::new();
        let pending: Vec<PendingFile> = modules
            .iter()
            .map(|module| PendingFile {
                path: self.intermediate_dir().join(format!("{}.def", module.name)),
                contents: generator.generate(&module.name, &module.signatures),
            })
            .collect();

        self.create_output_directories()?;
        let tool = LibTool::new(self.args.lib_tool.clone().unwrap_or_else(|| self.config.lib_tool.clone()));
        let mut written = Vec::with_capacity(pending.len() * 2);
        for (module, def) in modules.iter().zip(&pending) {
            written.extend(self.write_pending(std::slice::from_ref(def))?);
            let lib_path = self.args.output.join(format!("{}.lib", module.name));
            tool.run(machine, &def.path, &lib_path)?;
            written.push(lib_path);
        }
        Ok(written)
    }

    fn create_output_directories(&self) -> Result<(), GenerationError> {
        for dir in [self.args.output.as_path(), self.intermediate_dir()] {
            fs::create_dir_all(dir).map_err(|e| GenerationError::FileSystem(format!("Cannot create directory {}: {}", dir.display(), e)))?;
        }
        Ok(())
    }

    fn write_pending(&self, files: &[PendingFile]) -> Result<Vec<PathBuf>, GenerationError> {
        let mut written = Vec::with_capacity(files.len());
        for file in files {
            fs::write(&file.path, &file.contents).map_err(|e| GenerationError::FileSystem(format!("Cannot write {}: {}", file.path.display(), e)))?;
            info!(path = %file.path.display(), bytes = file.contents.len(), "wrote file");
            written.push(file.path.clone());
        }
        Ok(written)
    }
}

/// Main entry point for the generate command
pub fn run_generate(args: GenerateArgs) -> Result<(), GenerationError> {
    GenerationPipeline::new(args)?.execute()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    fn args(temp_dir: &TempDir, stub_type: StubType, inputs: Vec<PathBuf>) -> GenerateArgs {
        GenerateArgs {
            inputs,
            output: temp_dir.path().join("out"),
            intermediate_dir: None,
            stub_type,
            stubfile_name: Some("stubs".to_string()),
            path_from_source: Some("media".to_string()),
            extra_stub_header: None,
            module_name: None,
            export_macro: None,
            logging_function: None,
            logging_include: None,
            lib_tool: None,
            config: None,
        }
    }

    fn write_sigs(temp_dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = temp_dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_exit_codes() {
        let subprocess = GenerationError::Subprocess {
            message: "lib failed".to_string(),
            code: 3,
        };
        assert_eq!(subprocess.exit_code(), 3);
        assert_eq!(GenerationError::InvalidOptions("x".to_string()).exit_code(), 1);
        assert_eq!(GenerationError::Codegen(CodegenError::NoModules).exit_code(), 1);
    }

    #[test_case(StubType::PosixStubs, None, Some("media"), None ; "posix without stub name")]
    #[test_case(StubType::PosixStubs, Some("stubs"), None, None ; "posix without path")]
    #[test_case(StubType::WindowsDef, None, None, None ; "def without module name")]
    fn test_invalid_option_combinations(stub_type: StubType, stubfile_name: Option<&str>, path_from_source: Option<&str>, module_name: Option<&str>) {
        let temp_dir = TempDir::new().unwrap();
        let mut args = args(&temp_dir, stub_type, vec![temp_dir.path().join("a.sigs")]);
        args.stubfile_name = stubfile_name.map(str::to_string);
        args.path_from_source = path_from_source.map(str::to_string);
        args.module_name = module_name.map(str::to_string);

        let pipeline = GenerationPipeline::with_config(args, DotStubConfig::default());
        assert!(matches!(pipeline.validate(), Err(GenerationError::InvalidOptions(_))));
    }

    #[test]
    fn test_intermediate_dir_defaults_to_output() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = GenerationPipeline::with_config(args(&temp_dir, StubType::PosixStubs, Vec::new()), DotStubConfig::default());
        assert_eq!(pipeline.intermediate_dir(), temp_dir.path().join("out"));
    }

    #[test]
    fn test_posix_stubs_written_to_separate_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_sigs(&temp_dir, "libfoo.so.sigs", "int foo(int a)\n");
        let mut args = args(&temp_dir, StubType::PosixStubs, vec![input]);
        args.intermediate_dir = Some(temp_dir.path().join("gen"));

        let written = GenerationPipeline::with_config(args, DotStubConfig::default()).execute().unwrap();

        assert_eq!(written, vec![temp_dir.path().join("gen/stubs.cc"), temp_dir.path().join("out/stubs.h")]);
        let header = fs::read_to_string(temp_dir.path().join("out/stubs.h")).unwrap();
        assert!(header.contains("  kModuleLibfoo = 0,"));
    }

    #[test]
    fn test_flags_override_config() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_sigs(&temp_dir, "libfoo.sigs", "int foo(int a)\n");
        let mut args = args(&temp_dir, StubType::PosixStubs, vec![input]);
        args.logging_function = Some("LOG(ERROR)".to_string());
        let config = DotStubConfig {
            export_macro: "FOO_EXPORT".to_string(),
            logging_function: "DVLOG(2)".to_string(),
            ..DotStubConfig::default()
        };

        GenerationPipeline::with_config(args, config).execute().unwrap();
        let implementation = fs::read_to_string(temp_dir.path().join("out/stubs.cc")).unwrap();

        assert!(implementation.contains("int FOO_EXPORT foo(int a) {"));
        assert!(implementation.contains("LOG(ERROR) << \"Couldn't load foo"));
        assert!(!implementation.contains("DVLOG(2)"));
    }

    #[test]
    fn test_bad_signature_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let good = write_sigs(&temp_dir, "good.sigs", "int foo(int a)\n");
        let bad = write_sigs(&temp_dir, "bad.sigs", "int foo(int a)\nnot a signature\n");

        let result = GenerationPipeline::with_config(args(&temp_dir, StubType::PosixStubs, vec![good, bad]), DotStubConfig::default()).execute();

        match result {
            Err(GenerationError::Parse(error)) => assert_eq!(error.position.line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_missing_extra_stub_header() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_sigs(&temp_dir, "libfoo.sigs", "int foo(int a)\n");
        let mut args = args(&temp_dir, StubType::PosixStubs, vec![input]);
        args.extra_stub_header = Some(temp_dir.path().join("missing.fragment"));

        let result = GenerationPipeline::with_config(args, DotStubConfig::default()).execute();
        assert!(matches!(result, Err(GenerationError::FileSystem(_))));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_windows_def_combines_modules() {
        let temp_dir = TempDir::new().unwrap();
        let first = write_sigs(&temp_dir, "a.sigs", "int a1(void)\n");
        let second = write_sigs(&temp_dir, "b.sigs", "void b1(int x)\n");
        let mut args = args(&temp_dir, StubType::WindowsDef, vec![first, second]);
        args.module_name = Some("combined.dll".to_string());

        let written = GenerationPipeline::with_config(args, DotStubConfig::default()).execute().unwrap();

        assert_eq!(written, vec![temp_dir.path().join("out/combined.def")]);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "LIBRARY combined.dll\nEXPORTS\n  a1\n  b1\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_windows_lib_writes_def_then_runs_tool() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_sigs(&temp_dir, "avcodec-53.sigs", "int avcodec_open(void* ctx)\n");
        let mut args = args(&temp_dir, StubType::WindowsLibX64, vec![input]);
        args.intermediate_dir = Some(temp_dir.path().join("gen"));
        args.lib_tool = Some("true".to_string());

        let written = GenerationPipeline::with_config(args, DotStubConfig::default()).execute().unwrap();

        assert_eq!(written, vec![temp_dir.path().join("gen/avcodec-53.def"), temp_dir.path().join("out/avcodec-53.lib")]);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "LIBRARY avcodec-53\nEXPORTS\n  avcodec_open\n");
    }
}
