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


//! Whole-unit generation tests: parse signature text, render, check output

use dotstub_compiler::codegen::{CodegenError, PosixStubConfig, PosixStubGenerator, WindowsDefGenerator};
use dotstub_compiler::model::{GenerationUnit, Signature, StubModule};
use dotstub_compiler::parser::{RegexSignatureParser, SignatureParser};
use proptest::prelude::*;

const LIBFOO_SIGS: &str = "\
// Signatures exported by libfoo.
# Both comment styles are skipped.
int foo(int a)

void bar(const char* fmt, ...)
";

fn parse(source: &str) -> Vec<Signature> {
    RegexSignatureParser::new().parse_source(source).unwrap()
}

fn libfoo_unit() -> GenerationUnit {
    GenerationUnit::new(vec![StubModule::new("libfoo", parse(LIBFOO_SIGS))], "media", "stubs")
}

#[test]
fn test_header_golden() {
    let generated = PosixStubGenerator::default().generate(&libfoo_unit()).unwrap();
    let expected = "\
// This is generated file. Do not modify directly.

#ifndef MEDIA_
#define MEDIA_

#include <stdarg.h>
#include <map>
#include <string>
#include <vector>

#include \"base/logging.h\"

namespace media {
// Individual module initializer functions.
bool IsLibfooInitialized();
void InitializeLibfoo(void* module);
void UninitializeLibfoo();

// Enum and typedef for umbrella initializer.
enum StubModules {
  kModuleLibfoo = 0,
  kNumStubModules
};

typedef std::map<StubModules, std::vector<std::string> > StubPathMap;

// Umbrella initializer for all the modules in this stub file.
bool InitializeStubs(const StubPathMap& path_map);
}  // namespace media

#endif  // MEDIA_
";
    assert_eq!(generated.header, expected);
}

#[test]
fn test_implementation_extern_block_golden() {
    let config = PosixStubConfig::default().with_export_macro("MEDIA_EXPORT");
    let generated = PosixStubGenerator::new(config).generate(&libfoo_unit()).unwrap();
    let expected = "\
// This is generated file. Do not modify directly.

#include \"media/stubs.h\"

#include <stdlib.h>  // For NULL.
#include <dlfcn.h>   // For dlsym, dlopen.

#include <map>
#include <vector>

#include \"base/compiler_specific.h\"
extern \"C\" {

// Module libfoo.
// Static pointers that will hold the location of the real function
// implementations after the module has been loaded.
static int (*foo_ptr)(int a) = NULL;
static void (*bar_ptr)(const char* fmt, ...) = NULL;

// Stubs that dispatch to the real implementations.
extern int foo(int a) __attribute__((weak));
DISABLE_CFI_ICALL
int MEDIA_EXPORT foo(int a) {
  return foo_ptr(a);
}
extern void bar(const char* fmt, ...) __attribute__((weak));
DISABLE_CFI_ICALL
void MEDIA_EXPORT bar(const char* fmt, ...) {
  va_list args___;
  va_start(args___, fmt);
  bar_ptr(fmt, va_arg(args___, void*));
  va_end(args___);
}


}  // extern \"C\"


namespace media {

";
    assert!(generated.implementation.starts_with(expected), "{}", generated.implementation);
}

#[test]
fn test_lifecycle_functions_precede_umbrella() {
    let generated = PosixStubGenerator::default().generate(&libfoo_unit()).unwrap();
    let text = &generated.implementation;

    let is_initialized = text.find("bool IsLibfooInitialized() {\n  if (foo_ptr &&\n      bar_ptr) {").unwrap();
    let initialize = text.find("void InitializeLibfoo(void* module) {").unwrap();
    let uninitialize = text.find("void UninitializeLibfoo() {\n  foo_ptr = NULL;\n  bar_ptr = NULL;\n}").unwrap();
    let handle_map = text.find("typedef std::map<StubModules, void*> StubHandleMap;").unwrap();

    assert!(is_initialized < initialize && initialize < uninitialize && uninitialize < handle_map);
    assert!(text.contains("      dlsym(module, \"bar\"));\n"));
}

#[test]
fn test_extra_stub_header_and_logging() {
    let config = PosixStubConfig::default().with_logging("LOG(ERROR)", "base/log.h").with_extra_stub_header("#include <va/va.h>\n");
    let generated = PosixStubGenerator::new(config).generate(&libfoo_unit()).unwrap();

    assert!(generated.header.contains("#include \"base/log.h\"\n"));
    assert!(generated.implementation.contains("#include \"base/compiler_specific.h\"\n\n#include <va/va.h>\n\nextern \"C\" {\n"));
    assert!(generated.implementation.contains("    LOG(ERROR) << \"Couldn't load foo, dlerror() says:\\n\"\n"));
    assert!(!generated.implementation.contains("VLOG(1)"));
}

#[test]
fn test_multiple_modules_share_one_loader() {
    let unit = GenerationUnit::new(
        vec![StubModule::new("libva", parse("int vaInitialize(void* dpy)\n")), StubModule::new("libva-x11", parse("void* vaGetDisplay(void* dpy)\n"))],
        "media/gpu",
        "va_stubs",
    );
    let generated = PosixStubGenerator::default().generate(&unit).unwrap();

    assert!(generated.header.contains("namespace media_gpu {"));
    assert!(generated.header.contains("  kModuleLibva = 0,\n  kModuleLibvaX11,\n  kNumStubModules\n"));
    assert_eq!(generated.implementation.matches("bool InitializeStubs(").count(), 1);
    assert!(generated.implementation.contains("  if (!IsLibvaInitialized() ||\n      !IsLibvaX11Initialized()) {\n    UninitializeLibva();\n    UninitializeLibvaX11();\n"));
}

#[test]
fn test_zero_modules_is_an_error() {
    let unit = GenerationUnit::new(Vec::new(), "media", "stubs");
    assert_eq!(PosixStubGenerator::default().generate(&unit).unwrap_err(), CodegenError::NoModules);
}

#[test]
fn test_windows_def_across_modules() {
    let first = parse("int a1(void)\nint a2(int x)\n");
    let second = parse("void b1(void)\n");
    let text = WindowsDefGenerator::new().generate("combined.dll", first.iter().chain(second.iter()));

    assert_eq!(text, "LIBRARY combined.dll\nEXPORTS\n  a1\n  a2\n  b1\n");
}

fn signature_strategy() -> impl Strategy<Value = Signature> {
    let return_type = prop::sample::select(vec!["int", "void", "const char*", "unsigned long", "void*"]);
    let name = "[a-z][a-z0-9_]{1,10}";
    let param = prop::sample::select(vec!["int a", "const char* s", "void* data", "size_t len", "double d"]);
    (return_type, name, prop::collection::vec(param, 0..4)).prop_map(|(ret, name, params)| {
        let params = if params.is_empty() { vec!["void".to_string()] } else { params.into_iter().map(str::to_string).collect() };
        Signature::new(ret, name, params)
    })
}

fn render_source(signatures: &[Signature]) -> String {
    signatures.iter().map(|s| format!("{} {}({})\n", s.return_type, s.name, s.joined_params())).collect()
}

proptest! {
    #[test]
    fn prop_parse_identity(signatures in prop::collection::vec(signature_strategy(), 1..12)) {
        let parsed = parse(&render_source(&signatures));
        prop_assert_eq!(parsed, signatures);
    }

    #[test]
    fn prop_generation_is_deterministic(modules in prop::collection::vec(prop::collection::vec(signature_strategy(), 0..6), 1..5)) {
        let build = || {
            let modules = modules.iter().enumerate().map(|(i, sigs)| StubModule::new(format!("lib{}", i), parse(&render_source(sigs)))).collect();
            GenerationUnit::new(modules, "third_party/gen", "gen_stubs")
        };
        let generator = PosixStubGenerator::default();

        let first = generator.generate(&build()).unwrap();
        let second = generator.generate(&build()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_loader_closes_before_every_failed_return(module_count in 1usize..6) {
        let modules = (0..module_count).map(|i| StubModule::new(format!("m{}", i), vec![Signature::new("int", format!("f{}", i), vec!["void".to_string()])])).collect();
        let generated = PosixStubGenerator::default().generate(&GenerationUnit::new(modules, "x", "stubs")).unwrap();
        let loader = &generated.implementation[generated.implementation.find("bool InitializeStubs(").unwrap()..];
        let lines: Vec<&str> = loader.lines().collect();

        for (index, _) in lines.iter().enumerate().filter(|(_, l)| l.trim() == "return false;") {
            prop_assert_eq!(lines[index - 1].trim(), "CloseLibraries(&opened_libraries);", "failure return at loader line {} leaks handles", index);
        }

        let uninit_last = loader.rfind(&format!("    UninitializeM{}();", module_count - 1)).unwrap();
        let final_close = loader.rfind("    CloseLibraries(&opened_libraries);").unwrap();
        prop_assert!(uninit_last < final_close);
    }
}
