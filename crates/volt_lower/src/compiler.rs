//! The compilation driver: source in, module descriptors out.
//!
//! A [`Compiler`] owns the interner, the source database, the diagnostic
//! sink, and the module registry (seeded with the built-in primitives).
//! Successive calls to [`compile_source`](Compiler::compile_source) extend
//! the registry; later modules may reference earlier ones. A failed call
//! rolls back every descriptor it registered, leaving the registry exactly
//! as the last successful call left it.

use std::path::PathBuf;

use volt_common::{Ident, NameTable};
use volt_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use volt_hdl_parser::ast::ModuleDecl;
use volt_hdl_parser::{lexer, parser::HdlParser};
use volt_netlist::{limits, Connection, ModuleDesc, ModuleRegistry, Part};
use volt_source::SourceDb;

use crate::connect;
use crate::errors;
use crate::symbols;
use crate::width;

/// The HDL compiler: lexes, parses, and lowers module declarations into the
/// module registry.
pub struct Compiler {
    interner: NameTable,
    sources: SourceDb,
    sink: DiagnosticSink,
    registry: ModuleRegistry,
    anon_counter: u32,
}

impl Compiler {
    /// Creates a compiler whose registry holds the three built-in primitives.
    pub fn new() -> Self {
        let interner = NameTable::new();
        let registry = ModuleRegistry::with_builtins(&interner);
        Self {
            interner,
            sources: SourceDb::new(),
            sink: DiagnosticSink::new(),
            registry,
            anon_counter: 0,
        }
    }

    /// Compiles all `module` declarations in `text`, in order.
    ///
    /// `name` labels the source in diagnostics. Returns `true` on success.
    /// On failure the first error is in the [`sink`](Compiler::sink) and the
    /// registry is unchanged relative to prior successful calls.
    pub fn compile_source(&mut self, name: impl Into<PathBuf>, text: &str) -> bool {
        let registry_len = self.registry.len();
        let errors_before = self.sink.error_count();

        let file = self.sources.add_source(name, text.to_string());
        let tokens = lexer::lex(text, file, &self.sink);
        let mut parser = HdlParser::new(tokens, text, file, &self.interner, &self.sink);
        let ast = parser.parse_source_file();

        if self.sink.error_count() > errors_before {
            self.registry.truncate(registry_len);
            return false;
        }

        for decl in &ast.modules {
            if !self.compile_module(decl) {
                self.registry.truncate(registry_len);
                return false;
            }
        }

        true
    }

    /// Compiles one module declaration and registers its descriptor.
    fn compile_module(&mut self, decl: &ModuleDecl) -> bool {
        if self.registry.len() >= limits::MAX_MODULES {
            self.sink.emit(errors::error_capacity(
                errors::E304,
                "modules",
                limits::MAX_MODULES,
                decl.span,
            ));
            return false;
        }
        if self.registry.lookup(decl.name).is_some() {
            self.sink.emit(errors::error_duplicate_module(
                self.interner.resolve(decl.name),
                decl.span,
            ));
            return false;
        }

        let Some(mut table) = symbols::build_symbol_table(
            decl,
            &self.registry,
            &self.interner,
            &self.sink,
            &mut self.anon_counter,
        ) else {
            return false;
        };

        if width::infer_widths(&mut table, &self.registry, &self.interner, &self.sink).is_err() {
            return false;
        }

        let Ok(lowered) =
            connect::lower_connections(&table, &self.registry, &self.interner, &self.sink)
        else {
            return false;
        };

        let desc = assemble_descriptor(decl.name, &table, lowered, &self.registry);
        self.registry.insert(desc);
        true
    }

    /// The string interner shared across the compilation session.
    pub fn interner(&self) -> &NameTable {
        &self.interner
    }

    /// The module registry, built-ins first, then compiled modules in order.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// The diagnostic sink holding all emitted diagnostics.
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    /// The source database backing diagnostic rendering.
    pub fn sources(&self) -> &SourceDb {
        &self.sources
    }

    /// Renders every accumulated diagnostic as terminal text.
    pub fn render_diagnostics(&self) -> String {
        let renderer = TerminalRenderer::new();
        self.sink
            .diagnostics()
            .iter()
            .map(|d| renderer.render(d, &self.sources))
            .collect()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles the final descriptor from the lowered connections, computing
/// sink counts and node counts bottom-up.
///
/// Only reached after a fully successful lowering, so the precomputed counts
/// never describe a half-compiled module.
fn assemble_descriptor(
    name: Ident,
    table: &symbols::SymbolTable,
    lowered: connect::LoweredConnections,
    registry: &ModuleRegistry,
) -> ModuleDesc {
    let input_widths: Vec<u32> = table.inputs.iter().map(|e| e.width()).collect();
    let output_widths: Vec<u32> = table.outputs.iter().map(|e| e.width()).collect();

    let parts: Vec<Part> = table
        .parts
        .iter()
        .map(|p| Part {
            desc: p.desc,
            label: p.label,
        })
        .collect();

    // sink_counts sums bottom-up: input bit i feeds, through each external
    // connection, all the sinks of the corresponding part input bit.
    let input_count: u32 = input_widths.iter().sum();
    let mut sink_counts = vec![0u32; input_count as usize];
    let mut node_count = 0u32;
    let mut dff_count = 0u32;

    for (part, conns) in parts.iter().zip(&lowered.part_connections) {
        let part_desc = registry.get(part.desc);
        node_count += part_desc.node_count;
        dff_count += part_desc.dff_count;
        for (slot, conn) in conns.iter().enumerate() {
            if let Connection::External { bit } = conn {
                sink_counts[*bit as usize] += part_desc.sink_counts[slot];
            }
        }
    }

    ModuleDesc {
        name,
        primitive: None,
        parts,
        part_connections: lowered.part_connections,
        input_widths,
        output_widths,
        outputs: lowered.outputs,
        sink_counts,
        node_count,
        dff_count,
    }
}
