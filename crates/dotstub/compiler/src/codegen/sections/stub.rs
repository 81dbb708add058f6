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


//! Pointer declarations and stub functions
//!
//! Every signature gets a file-scope function pointer and a stub with the
//! real signature that forwards to it. Stubs are declared weak so a real
//! definition (or a test mock) linked into the binary wins.
//!
//! Variadic functions only forward the first variadic value, as a `void*`.
//! There is no portable way to forward an arbitrary `va_list` tail to a
//! function that expects `...`, and callers of the generated code rely on
//! exactly this behaviour.

use super::traits::Render;
use crate::codegen::writer::SourceWriter;
use crate::model::{Signature, VARIADIC_PARAM};

/// Annotation placed before every stub; the call target is only known at runtime
pub const DISABLE_CFI_ICALL: &str = "DISABLE_CFI_ICALL";

/// `static <ret> (*<name>_ptr)(<params>) = NULL;`
#[derive(Debug, Clone, Copy)]
pub struct PointerDecl<'a> {
    signature: &'a Signature,
}

impl<'a> PointerDecl<'a> {
    pub fn new(signature: &'a Signature) -> Self {
        Self { signature }
    }
}

impl Render for PointerDecl<'_> {
    fn render(&self, out: &mut SourceWriter) {
        out.line(format!("static {} (*{})({}) = NULL;", self.signature.return_type, self.signature.pointer_name(), self.signature.joined_params()));
    }
}

/// The statements inside a stub function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubBody {
    /// Forward every argument, returning the result unless the function is void
    Plain { returns_value: bool, args: String },

    /// Forward the fixed arguments plus one variadic value and return the result
    VariadicReturn { fixed_args: String, last_named_arg: String },

    /// Forward the fixed arguments plus one variadic value
    VariadicVoid { fixed_args: String, last_named_arg: String },
}

impl StubBody {
    /// Pick the body template for a signature
    pub fn for_signature(signature: &Signature) -> Self {
        let args = signature.argument_names();
        let joined = args.join(", ");

        let is_variadic = !joined.is_empty() && args.len() > 1 && args.last().is_some_and(|a| a == VARIADIC_PARAM);
        if is_variadic {
            let named = &args[..args.len() - 1];
            let fixed_args = named.join(", ");
            let last_named_arg = named.last().cloned().unwrap_or_default();
            return if signature.returns_void() {
                StubBody::VariadicVoid { fixed_args, last_named_arg }
            } else {
                StubBody::VariadicReturn { fixed_args, last_named_arg }
            };
        }

        let args = if joined == "void" { String::new() } else { joined };
        StubBody::Plain {
            returns_value: !signature.returns_void(),
            args,
        }
    }

    /// Whether the body captures a variadic argument list
    pub fn is_variadic(&self) -> bool {
        !matches!(self, StubBody::Plain { .. })
    }

    fn render(&self, signature: &Signature, out: &mut SourceWriter) {
        let target = signature.pointer_name();
        match self {
            StubBody::Plain { returns_value, args } => {
                let prefix = if *returns_value { "return " } else { "" };
                out.line(format!("  {}{}({});", prefix, target, args));
            }
            StubBody::VariadicReturn { fixed_args, last_named_arg } => {
                out.line("  va_list args___;");
                out.line(format!("  va_start(args___, {});", last_named_arg));
                out.line(format!("  {} ret___ = {}({}, va_arg(args___, void*));", signature.return_type, target, fixed_args));
                out.line("  va_end(args___);");
                out.line("  return ret___;");
            }
            StubBody::VariadicVoid { fixed_args, last_named_arg } => {
                out.line("  va_list args___;");
                out.line(format!("  va_start(args___, {});", last_named_arg));
                out.line(format!("  {}({}, va_arg(args___, void*));", target, fixed_args));
                out.line("  va_end(args___);");
            }
        }
    }
}

/// A weak forward declaration plus the dispatching definition
#[derive(Debug, Clone)]
pub struct StubFunction<'a> {
    signature: &'a Signature,
    body: StubBody,
}

impl<'a> StubFunction<'a> {
    pub fn new(signature: &'a Signature) -> Self {
        Self {
            signature,
            body: StubBody::for_signature(signature),
        }
    }

    pub fn body(&self) -> &StubBody {
        &self.body
    }
}

impl Render for StubFunction<'_> {
    fn render(&self, out: &mut SourceWriter) {
        let sig = self.signature;
        let params = sig.joined_params();
        let export = sig.export_macro.as_deref().map(|m| format!("{} ", m)).unwrap_or_default();

        out.line(format!("extern {} {}({}) __attribute__((weak));", sig.return_type, sig.name, params));
        out.line(DISABLE_CFI_ICALL);
        out.line(format!("{} {}{}({}) {{", sig.return_type, export, sig.name, params));
        self.body.render(sig, out);
        out.line("}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(ret: &str, name: &str, params: &[&str]) -> Signature {
        Signature::new(ret, name, params.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_pointer_decl() {
        let s = sig("const char*", "av_version_info", &["void"]);
        assert_eq!(PointerDecl::new(&s).render_to_string(), "static const char* (*av_version_info_ptr)(void) = NULL;\n");
    }

    #[test]
    fn test_pointer_decl_keeps_variadic_params() {
        let s = sig("int", "Printf", &["const char* fmt", "..."]);
        assert_eq!(PointerDecl::new(&s).render_to_string(), "static int (*Printf_ptr)(const char* fmt, ...) = NULL;\n");
    }

    #[test]
    fn test_plain_stub() {
        let s = sig("int", "Foo", &["int a", "char* b[]"]);
        let expected = "\
extern int Foo(int a, char* b[]) __attribute__((weak));
DISABLE_CFI_ICALL
int Foo(int a, char* b[]) {
  return Foo_ptr(a, b);
}
";
        assert_eq!(StubFunction::new(&s).render_to_string(), expected);
    }

    #[test]
    fn test_void_stub_forwards_no_args() {
        let s = sig("void", "Bar", &["void"]);
        let stub = StubFunction::new(&s);

        assert_eq!(stub.body(), &StubBody::Plain { returns_value: false, args: String::new() });
        assert!(stub.render_to_string().contains("\n  Bar_ptr();\n"));
    }

    #[test]
    fn test_export_macro_placement() {
        let s = sig("int", "Foo", &["void"]).with_export("MEDIA_EXPORT");
        assert!(StubFunction::new(&s).render_to_string().contains("\nint MEDIA_EXPORT Foo(void) {\n"));
    }

    #[test]
    fn test_variadic_void_stub() {
        let s = sig("void", "Printf", &["const char* fmt", "..."]);
        let stub = StubFunction::new(&s);
        let expected = "\
extern void Printf(const char* fmt, ...) __attribute__((weak));
DISABLE_CFI_ICALL
void Printf(const char* fmt, ...) {
  va_list args___;
  va_start(args___, fmt);
  Printf_ptr(fmt, va_arg(args___, void*));
  va_end(args___);
}
";
        assert!(stub.body().is_variadic());
        assert_eq!(stub.render_to_string(), expected);
    }

    #[test]
    fn test_variadic_return_stub() {
        let s = sig("int", "Snprintf", &["char* buf", "size_t n", "const char* fmt", "..."]);
        let expected = "\
extern int Snprintf(char* buf, size_t n, const char* fmt, ...) __attribute__((weak));
DISABLE_CFI_ICALL
int Snprintf(char* buf, size_t n, const char* fmt, ...) {
  va_list args___;
  va_start(args___, fmt);
  int ret___ = Snprintf_ptr(buf, n, fmt, va_arg(args___, void*));
  va_end(args___);
  return ret___;
}
";
        assert_eq!(StubFunction::new(&s).render_to_string(), expected);
    }

    #[test]
    fn test_lone_ellipsis_is_not_variadic() {
        let s = sig("void", "Odd", &["..."]);
        assert!(!StubBody::for_signature(&s).is_variadic());
    }

    #[test]
    fn test_empty_params() {
        let s = sig("int", "Count", &[""]);
        assert_eq!(StubBody::for_signature(&s), StubBody::Plain { returns_value: true, args: String::new() });
    }
}
