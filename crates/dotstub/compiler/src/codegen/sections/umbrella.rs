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


//! Umbrella initializer
//!
//! `InitializeStubs` opens the library of every module and initializes all
//! of them as one unit. It either returns true with every module fully
//! initialized, or returns false after closing every library it opened and,
//! if initializers already ran, uninitializing every module. Libraries are
//! opened strictly in enum order, one at a time.

use super::traits::Render;
use crate::codegen::writer::SourceWriter;
use crate::ident::ModuleIdentifiers;
use crate::model::StubModule;

/// Enum value terminating the module list
pub const MODULE_COUNT_NAME: &str = "kNumStubModules";

/// `enum StubModules` listing every module in run order
#[derive(Debug, Clone)]
pub struct UmbrellaEnum {
    entries: Vec<String>,
}

impl UmbrellaEnum {
    pub fn new(modules: &[StubModule]) -> Self {
        Self {
            entries: modules.iter().map(|m| m.identifiers().enum_name).collect(),
        }
    }
}

impl Render for UmbrellaEnum {
    fn render(&self, out: &mut SourceWriter) {
        out.comment("Enum and typedef for umbrella initializer.");
        out.line("enum StubModules {");
        for (index, entry) in self.entries.iter().enumerate() {
            if index == 0 {
                out.line(format!("  {} = 0,", entry));
            } else {
                out.line(format!("  {},", entry));
            }
        }
        out.line(format!("  {}", MODULE_COUNT_NAME));
        out.line("};");
        out.blank_line();
    }
}

/// Path map typedef and the `InitializeStubs` prototype
#[derive(Debug, Clone, Copy, Default)]
pub struct UmbrellaPrototype;

impl Render for UmbrellaPrototype {
    fn render(&self, out: &mut SourceWriter) {
        out.line("typedef std::map<StubModules, std::vector<std::string> > StubPathMap;");
        out.blank_line();
        out.comment("Umbrella initializer for all the modules in this stub file.");
        out.line("bool InitializeStubs(const StubPathMap& path_map);");
    }
}

/// Handle map typedef, `CloseLibraries` and `InitializeStubs`
#[derive(Debug, Clone)]
pub struct UmbrellaInitializer<'a> {
    modules: Vec<ModuleIdentifiers>,
    logging_function: &'a str,
}

impl<'a> UmbrellaInitializer<'a> {
    pub fn new(modules: &[StubModule], logging_function: &'a str) -> Self {
        Self {
            modules: modules.iter().map(StubModule::identifiers).collect(),
            logging_function,
        }
    }

    fn render_close_libraries(&self, out: &mut SourceWriter) {
        out.line("typedef std::map<StubModules, void*> StubHandleMap;");
        out.blank_line();
        out.line("static void CloseLibraries(StubHandleMap* stub_handles) {");
        out.line("  for (StubHandleMap::const_iterator it = stub_handles->begin();");
        out.line("       it != stub_handles->end();");
        out.line("       ++it) {");
        out.line("    dlclose(it->second);");
        out.line("  }");
        out.blank_line();
        out.line("  stub_handles->clear();");
        out.line("}");
        out.blank_line();
    }

    /// Open every library; any module without an openable library rolls back
    /// before a single initializer has run
    fn render_open_libraries(&self, out: &mut SourceWriter) {
        let log = self.logging_function;
        out.line("bool InitializeStubs(const StubPathMap& path_map) {");
        out.line("  StubHandleMap opened_libraries;");
        out.line(format!("  for (int i = 0; i < {}; ++i) {{", MODULE_COUNT_NAME));
        out.line("    StubModules cur_module = static_cast<StubModules>(i);");
        out.line("    // If a module is missing, we fail.");
        out.line("    StubPathMap::const_iterator it = path_map.find(cur_module);");
        out.line("    if (it == path_map.end()) {");
        out.line("      CloseLibraries(&opened_libraries);");
        out.line("      return false;");
        out.line("    }");
        out.blank_line();
        out.line("    // Otherwise, attempt to dlopen the library.");
        out.line("    const std::vector<std::string>& paths = it->second;");
        out.line("    bool module_opened = false;");
        out.line("    for (std::vector<std::string>::const_iterator dso_path = paths.begin();");
        out.line("         !module_opened && dso_path != paths.end();");
        out.line("         ++dso_path) {");
        out.line("      void* handle = dlopen(dso_path->c_str(), RTLD_LAZY);");
        out.line("      if (handle != NULL) {");
        out.line("        module_opened = true;");
        out.line("        opened_libraries[cur_module] = handle;");
        out.line("      } else {");
        out.line(format!("        {} << \"dlopen(\" << dso_path->c_str() << \") failed.\";", log));
        out.line(format!("        {} << \"dlerror() says:\\n\" << dlerror();", log));
        out.line("      }");
        out.line("    }");
        out.blank_line();
        out.line("    if (!module_opened) {");
        out.line("      CloseLibraries(&opened_libraries);");
        out.line("      return false;");
        out.line("    }");
        out.line("  }");
        out.blank_line();
    }

    /// Run every initializer, then roll everything back unless all succeeded
    fn render_initialize_and_check(&self, out: &mut SourceWriter) {
        out.line("  // Initialize each module if we have not already failed.");
        for ids in &self.modules {
            out.line(format!("  {}(opened_libraries[{}]);", ids.initialize, ids.enum_name));
        }
        out.blank_line();

        let checks: Vec<String> = self.modules.iter().map(|ids| format!("!{}()", ids.is_initialized)).collect();
        out.line("  // Check that each module is initialized correctly.");
        out.line("  // Close all previously opened libraries on failure.");
        out.line(format!("  if ({}) {{", checks.join(" ||\n      ")));
        for ids in &self.modules {
            out.line(format!("    {}();", ids.uninitialize));
        }
        out.line("    CloseLibraries(&opened_libraries);");
        out.line("    return false;");
        out.line("  }");
        out.blank_line();
        out.line("  return true;");
        out.line("}");
    }
}

impl Render for UmbrellaInitializer<'_> {
    fn render(&self, out: &mut SourceWriter) {
        self.render_close_libraries(out);
        self.render_open_libraries(out);
        self.render_initialize_and_check(out);
    }
}
