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


//! Per-module sections
//!
//! A module contributes its pointers and stubs to the implementation's
//! `extern "C"` block, its three lifecycle functions to the namespace block,
//! and their prototypes to the header. The pointers are the module's private
//! storage: only its own lifecycle functions assign them.

use super::stub::{PointerDecl, StubFunction};
use super::traits::Render;
use crate::codegen::writer::SourceWriter;
use crate::ident::ModuleIdentifiers;
use crate::model::{Signature, StubModule};

/// Pointer declarations and stubs of one module
#[derive(Debug, Clone)]
pub struct ModuleStubs<'a> {
    module: &'a StubModule,
    signatures: Vec<Signature>,
}

impl<'a> ModuleStubs<'a> {
    /// Stubs for `module`, each annotated with `export_macro`
    pub fn new(module: &'a StubModule, export_macro: &str) -> Self {
        Self {
            module,
            signatures: module.signatures.iter().map(|s| s.with_export(export_macro)).collect(),
        }
    }
}

impl Render for ModuleStubs<'_> {
    fn render(&self, out: &mut SourceWriter) {
        out.comment(format!("Module {}.", self.module.name));
        out.comment("Static pointers that will hold the location of the real function");
        out.comment("implementations after the module has been loaded.");
        for signature in &self.signatures {
            PointerDecl::new(signature).render(out);
        }
        out.blank_line();

        out.comment("Stubs that dispatch to the real implementations.");
        for signature in &self.signatures {
            StubFunction::new(signature).render(out);
        }
        out.blank_line();
    }
}

/// One of the three functions managing a module's pointers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    /// `bool Is<M>Initialized()`: every pointer is non-null
    IsInitialized,
    /// `void Initialize<M>(void* module)`: resolve every pointer with `dlsym`
    Initialize,
    /// `void Uninitialize<M>()`: reset every pointer to `NULL`
    Uninitialize,
}

impl LifecycleKind {
    pub const ALL: [LifecycleKind; 3] = [LifecycleKind::IsInitialized, LifecycleKind::Initialize, LifecycleKind::Uninitialize];
}

/// A lifecycle function definition for one module
#[derive(Debug, Clone)]
pub struct LifecycleFunction<'a> {
    kind: LifecycleKind,
    module: &'a StubModule,
    identifiers: ModuleIdentifiers,
    logging_function: &'a str,
}

impl<'a> LifecycleFunction<'a> {
    pub fn new(kind: LifecycleKind, module: &'a StubModule, logging_function: &'a str) -> Self {
        Self {
            kind,
            module,
            identifiers: module.identifiers(),
            logging_function,
        }
    }

    /// Conjunction of every pointer, one per line; `true` for an empty module
    fn pointer_conjunction(&self) -> String {
        if self.module.signatures.is_empty() {
            return "true".to_string();
        }
        self.module.signatures.iter().map(Signature::pointer_name).collect::<Vec<_>>().join(" &&\n      ")
    }

    fn render_is_initialized(&self, out: &mut SourceWriter) {
        out.comment("Returns true if all stubs have been properly initialized.");
        out.line(format!("bool {}() {{", self.identifiers.is_initialized));
        out.line(format!("  if ({}) {{", self.pointer_conjunction()));
        out.line("    return true;");
        out.line("  } else {");
        out.line("    return false;");
        out.line("  }");
        out.line("}");
        out.blank_line();
    }

    fn render_initialize(&self, out: &mut SourceWriter) {
        out.comment("Initializes the module stubs.");
        out.line(format!("void {}(void* module) {{", self.identifiers.initialize));
        for signature in &self.module.signatures {
            let pointer = signature.pointer_name();
            out.line(format!("  {} =", pointer));
            out.line(format!("    reinterpret_cast<{} (*)({})>(", signature.return_type, signature.joined_params()));
            out.line(format!("      dlsym(module, \"{}\"));", signature.name));
            out.line(format!("  if (!{}) {{", pointer));
            out.line(format!("    {} << \"Couldn't load {}, dlerror() says:\\n\"", self.logging_function, signature.name));
            out.line("      << dlerror();");
            out.line("  }");
        }
        out.line("}");
        out.blank_line();
    }

    fn render_uninitialize(&self, out: &mut SourceWriter) {
        out.comment("Uninitialize the module stubs.  Reset pointers to NULL.");
        out.line(format!("void {}() {{", self.identifiers.uninitialize));
        for signature in &self.module.signatures {
            out.line(format!("  {} = NULL;", signature.pointer_name()));
        }
        out.line("}");
        out.blank_line();
    }
}

impl Render for LifecycleFunction<'_> {
    fn render(&self, out: &mut SourceWriter) {
        match self.kind {
            LifecycleKind::IsInitialized => self.render_is_initialized(out),
            LifecycleKind::Initialize => self.render_initialize(out),
            LifecycleKind::Uninitialize => self.render_uninitialize(out),
        }
    }
}

/// Header prototypes of a module's lifecycle functions
#[derive(Debug, Clone)]
pub struct ModulePrototypes {
    identifiers: ModuleIdentifiers,
}

impl ModulePrototypes {
    pub fn new(module: &StubModule) -> Self {
        Self { identifiers: module.identifiers() }
    }
}

impl Render for ModulePrototypes {
    fn render(&self, out: &mut SourceWriter) {
        out.line(format!("bool {}();", self.identifiers.is_initialized));
        out.line(format!("void {}(void* module);", self.identifiers.initialize));
        out.line(format!("void {}();", self.identifiers.uninitialize));
        out.blank_line();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(ret: &str, name: &str, params: &[&str]) -> Signature {
        Signature::new(ret, name, params.iter().map(|p| p.to_string()).collect())
    }

    fn two_symbol_module() -> StubModule {
        StubModule::new("libfoo", vec![sig("int", "A", &["int x"]), sig("void", "B", &["void"])])
    }

    #[test]
    fn test_module_stubs_layout() {
        let module = two_symbol_module();
        let text = ModuleStubs::new(&module, "").render_to_string();
        let expected = "\
// Module libfoo.
// Static pointers that will hold the location of the real function
// implementations after the module has been loaded.
static int (*A_ptr)(int x) = NULL;
static void (*B_ptr)(void) = NULL;

// Stubs that dispatch to the real implementations.
extern int A(int x) __attribute__((weak));
DISABLE_CFI_ICALL
int A(int x) {
  return A_ptr(x);
}
extern void B(void) __attribute__((weak));
DISABLE_CFI_ICALL
void B(void) {
  B_ptr();
}

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_module_stubs_apply_export_macro() {
        let module = two_symbol_module();
        let text = ModuleStubs::new(&module, "FOO_EXPORT").render_to_string();

        assert!(text.contains("int FOO_EXPORT A(int x) {"));
        assert!(text.contains("void FOO_EXPORT B(void) {"));
        assert!(module.signatures.iter().all(|s| s.export_macro.is_none()));
    }

    #[test]
    fn test_is_initialized_conjunction() {
        let module = two_symbol_module();
        let text = LifecycleFunction::new(LifecycleKind::IsInitialized, &module, "VLOG(1)").render_to_string();
        let expected = "\
// Returns true if all stubs have been properly initialized.
bool IsLibfooInitialized() {
  if (A_ptr &&
      B_ptr) {
    return true;
  } else {
    return false;
  }
}

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_is_initialized_empty_module() {
        let module = StubModule::new("empty", Vec::new());
        let text = LifecycleFunction::new(LifecycleKind::IsInitialized, &module, "VLOG(1)").render_to_string();
        assert!(text.contains("  if (true) {\n"));
    }

    #[test]
    fn test_initialize_logs_and_continues() {
        let module = two_symbol_module();
        let text = LifecycleFunction::new(LifecycleKind::Initialize, &module, "LOG(ERROR)").render_to_string();
        let expected = "\
// Initializes the module stubs.
void InitializeLibfoo(void* module) {
  A_ptr =
    reinterpret_cast<int (*)(int x)>(
      dlsym(module, \"A\"));
  if (!A_ptr) {
    LOG(ERROR) << \"Couldn't load A, dlerror() says:\\n\"
      << dlerror();
  }
  B_ptr =
    reinterpret_cast<void (*)(void)>(
      dlsym(module, \"B\"));
  if (!B_ptr) {
    LOG(ERROR) << \"Couldn't load B, dlerror() says:\\n\"
      << dlerror();
  }
}

";
        assert_eq!(text, expected);
        assert!(!text.contains("return"));
    }

    #[test]
    fn test_uninitialize_only_resets_pointers() {
        let module = two_symbol_module();
        let text = LifecycleFunction::new(LifecycleKind::Uninitialize, &module, "VLOG(1)").render_to_string();
        let expected = "\
// Uninitialize the module stubs.  Reset pointers to NULL.
void UninitializeLibfoo() {
  A_ptr = NULL;
  B_ptr = NULL;
}

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_prototypes() {
        let module = two_symbol_module();
        assert_eq!(ModulePrototypes::new(&module).render_to_string(), "bool IsLibfooInitialized();\nvoid InitializeLibfoo(void* module);\nvoid UninitializeLibfoo();\n\n");
    }
}
