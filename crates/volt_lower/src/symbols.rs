//! Per-module symbol tables built from the AST.
//!
//! Four groups of symbol entries are collected per module: interface inputs,
//! interface outputs, per-part argument/result lists, and per-wire
//! input/output lists. Entry order is preserved throughout; connection lists
//! are laid out in exactly this order.
//!
//! Concatenation braces desugar here: every `{ ... }` that appears as a part
//! argument or nested inside a wire becomes an anonymous wire with a
//! generated name.

use volt_common::{Ident, NameTable};
use volt_diagnostics::DiagnosticSink;
use volt_hdl_parser::ast::{ModuleDecl, NetExpr, Stmt};
use volt_netlist::{limits, DescId, ModuleRegistry};
use volt_source::Span;

use crate::errors;

/// What a symbol entry names: a net by name, or a constant bit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum SymAtom {
    /// A named net.
    Name(Ident),
    /// A constant `0` or `1`.
    Const(bool),
}

/// One symbol occurrence: a net reference with its slice offset and width.
///
/// `offset` is the starting bit within the referent; `width` is the number
/// of bits consumed. A bare identifier has offset 0 and an initially unknown
/// width; `x[3]` has offset 3 and width 1; `x[2..5]` has offset 2 and width 4.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SymEntry {
    pub atom: SymAtom,
    pub span: Span,
    pub offset: u32,
    /// `None` until width inference resolves it.
    pub width: Option<u32>,
}

impl SymEntry {
    /// The resolved width of this entry.
    ///
    /// # Panics
    ///
    /// Panics if called before width inference has completed.
    pub fn width(&self) -> u32 {
        self.width.expect("symbol width resolved before lowering")
    }
}

/// One resolved part: the instantiated descriptor plus its optional label.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PartSlot {
    pub desc: DescId,
    pub label: Option<Ident>,
    pub span: Span,
}

/// The symbol table of one module under compilation.
pub(crate) struct SymbolTable {
    pub inputs: Vec<SymEntry>,
    pub outputs: Vec<SymEntry>,
    pub parts: Vec<PartSlot>,
    pub part_inputs: Vec<Vec<SymEntry>>,
    pub part_outputs: Vec<Vec<SymEntry>>,
    pub wire_inputs: Vec<Vec<SymEntry>>,
    /// One output entry per wire, parallel to `wire_inputs`.
    pub wire_outputs: Vec<SymEntry>,
}

impl SymbolTable {
    /// Finds a module input parameter by name.
    pub fn find_input(&self, name: Ident) -> Option<usize> {
        find_by_name(&self.inputs, name)
    }

    /// Finds a module output parameter by name.
    pub fn find_output(&self, name: Ident) -> Option<usize> {
        find_by_name(&self.outputs, name)
    }

    /// Finds a part result by name, returning `(part index, result index)`.
    pub fn find_part_output(&self, name: Ident) -> Option<(usize, usize)> {
        for (p, results) in self.part_outputs.iter().enumerate() {
            if let Some(j) = find_by_name(results, name) {
                return Some((p, j));
            }
        }
        None
    }

    /// Finds a wire by its output name.
    pub fn find_wire(&self, name: Ident) -> Option<usize> {
        find_by_name(&self.wire_outputs, name)
    }

    /// The absolute bit offset of input parameter `idx` within the module's
    /// flattened inputs.
    pub fn input_bit_offset(&self, idx: usize) -> u32 {
        self.inputs[..idx].iter().map(|e| e.width()).sum()
    }

    /// The absolute bit offset of output parameter `idx` within the module's
    /// flattened outputs.
    pub fn output_bit_offset(&self, idx: usize) -> u32 {
        self.outputs[..idx].iter().map(|e| e.width()).sum()
    }

    /// The total number of module input bits.
    pub fn input_count(&self) -> u32 {
        self.input_bit_offset(self.inputs.len())
    }

    /// The total number of module output bits.
    pub fn output_count(&self) -> u32 {
        self.output_bit_offset(self.outputs.len())
    }
}

fn find_by_name(entries: &[SymEntry], name: Ident) -> Option<usize> {
    entries
        .iter()
        .position(|e| matches!(e.atom, SymAtom::Name(n) if n == name))
}

/// Builds the symbol table for one module declaration.
///
/// Resolves part module names against the registry, checks arities, labels,
/// and capacity limits, and desugars concatenations into anonymous wires.
/// Returns `None` if any check fails (diagnostics are emitted to the sink).
pub(crate) fn build_symbol_table(
    decl: &ModuleDecl,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
    anon_counter: &mut u32,
) -> Option<SymbolTable> {
    let mut table = SymbolTable {
        inputs: Vec::new(),
        outputs: Vec::new(),
        parts: Vec::new(),
        part_inputs: Vec::new(),
        part_outputs: Vec::new(),
        wire_inputs: Vec::new(),
        wire_outputs: Vec::new(),
    };
    let mut ok = true;

    // Interface entries; declared widths are known immediately.
    let mut declared: Vec<(Ident, Span)> = Vec::new();
    for port in decl.inputs.iter().chain(&decl.outputs) {
        if let Some(&(_, prev)) = declared.iter().find(|(n, _)| *n == port.name) {
            sink.emit(errors::error_duplicate_name(
                interner.resolve(port.name),
                port.span,
                prev,
            ));
            ok = false;
        }
        declared.push((port.name, port.span));
    }
    for port in &decl.inputs {
        table.inputs.push(SymEntry {
            atom: SymAtom::Name(port.name),
            span: port.span,
            offset: 0,
            width: Some(port.width),
        });
    }
    for port in &decl.outputs {
        table.outputs.push(SymEntry {
            atom: SymAtom::Name(port.name),
            span: port.span,
            offset: 0,
            width: Some(port.width),
        });
    }

    if table.input_count() as usize > limits::MAX_INPUT_BITS {
        sink.emit(errors::error_capacity(
            errors::E302,
            "input bits",
            limits::MAX_INPUT_BITS,
            decl.span,
        ));
        return None;
    }
    if table.output_count() as usize > limits::MAX_OUTPUT_BITS {
        sink.emit(errors::error_capacity(
            errors::E303,
            "output bits",
            limits::MAX_OUTPUT_BITS,
            decl.span,
        ));
        return None;
    }

    if decl.stmts.is_empty() {
        sink.emit(errors::error_empty_module(
            interner.resolve(decl.name),
            decl.span,
        ));
        return None;
    }

    for stmt in &decl.stmts {
        match stmt {
            Stmt::Part(part) => {
                if table.parts.len() >= limits::MAX_PARTS {
                    sink.emit(errors::error_capacity(
                        errors::E300,
                        "parts",
                        limits::MAX_PARTS,
                        part.span,
                    ));
                    return None;
                }

                let Some(desc_id) = registry.lookup(part.module) else {
                    sink.emit(errors::error_unknown_module(
                        interner.resolve(part.module),
                        part.span,
                    ));
                    ok = false;
                    continue;
                };
                let desc = registry.get(desc_id);

                if let Some(label) = part.label {
                    if let Some(prev) = table
                        .parts
                        .iter()
                        .find(|p| p.label == Some(label))
                        .map(|p| p.span)
                    {
                        sink.emit(errors::error_duplicate_name(
                            interner.resolve(label),
                            part.span,
                            prev,
                        ));
                        ok = false;
                    }
                }

                if part.args.len() != desc.input_param_count() {
                    sink.emit(errors::error_argument_count(
                        interner.resolve(part.module),
                        desc.input_param_count(),
                        part.args.len(),
                        part.span,
                    ));
                    ok = false;
                }
                if part.results.len() != desc.output_param_count() {
                    sink.emit(errors::error_result_count(
                        interner.resolve(part.module),
                        desc.output_param_count(),
                        part.results.len(),
                        part.span,
                    ));
                    ok = false;
                }

                let mut args = Vec::with_capacity(part.args.len());
                for arg in &part.args {
                    let Some(entry) =
                        entry_from_expr(arg, &mut table, interner, sink, anon_counter)
                    else {
                        return None;
                    };
                    args.push(entry);
                }

                let mut results = Vec::with_capacity(part.results.len());
                for result in &part.results {
                    match result {
                        NetExpr::Ref { name, slice, span } => results.push(SymEntry {
                            atom: SymAtom::Name(*name),
                            span: *span,
                            offset: slice.map_or(0, |s| s.start),
                            width: slice.map(|s| s.width()),
                        }),
                        other => {
                            sink.emit(errors::error_result_not_identifier(other.span()));
                            ok = false;
                        }
                    }
                }

                table.parts.push(PartSlot {
                    desc: desc_id,
                    label: part.label,
                    span: part.span,
                });
                table.part_inputs.push(args);
                table.part_outputs.push(results);
            }
            Stmt::Wire(wire) => {
                if table.wire_outputs.len() >= limits::MAX_WIRES {
                    sink.emit(errors::error_capacity(
                        errors::E301,
                        "wires",
                        limits::MAX_WIRES,
                        wire.span,
                    ));
                    return None;
                }

                // Reserve the wire slot before desugaring nested
                // concatenations so nested anonymous wires land after it.
                let wire_idx = table.wire_outputs.len();
                table.wire_inputs.push(Vec::new());
                let output = match &wire.output {
                    NetExpr::Ref { name, slice, span } => SymEntry {
                        atom: SymAtom::Name(*name),
                        span: *span,
                        offset: slice.map_or(0, |s| s.start),
                        width: slice.map(|s| s.width()),
                    },
                    other => {
                        // The parser already rejected this form.
                        sink.emit(errors::error_result_not_identifier(other.span()));
                        return None;
                    }
                };
                table.wire_outputs.push(output);

                let mut inputs = Vec::with_capacity(wire.inputs.len());
                for input in &wire.inputs {
                    let Some(entry) =
                        entry_from_expr(input, &mut table, interner, sink, anon_counter)
                    else {
                        return None;
                    };
                    inputs.push(entry);
                }
                table.wire_inputs[wire_idx] = inputs;
            }
        }
    }

    ok.then_some(table)
}

/// Converts a net expression into a symbol entry, desugaring concatenations
/// into anonymous wires as a side effect.
fn entry_from_expr(
    expr: &NetExpr,
    table: &mut SymbolTable,
    interner: &NameTable,
    sink: &DiagnosticSink,
    anon_counter: &mut u32,
) -> Option<SymEntry> {
    match expr {
        NetExpr::Ref { name, slice, span } => Some(SymEntry {
            atom: SymAtom::Name(*name),
            span: *span,
            offset: slice.map_or(0, |s| s.start),
            width: slice.map(|s| s.width()),
        }),
        NetExpr::Const { value, span } => Some(SymEntry {
            atom: SymAtom::Const(*value),
            span: *span,
            offset: 0,
            width: None,
        }),
        NetExpr::Concat { parts, span } => {
            if table.wire_outputs.len() >= limits::MAX_WIRES {
                sink.emit(errors::error_capacity(
                    errors::E301,
                    "wires",
                    limits::MAX_WIRES,
                    *span,
                ));
                return None;
            }

            *anon_counter += 1;
            let name = interner.anonymous_wire(*anon_counter);
            let entry = SymEntry {
                atom: SymAtom::Name(name),
                span: *span,
                offset: 0,
                width: None,
            };

            let wire_idx = table.wire_outputs.len();
            table.wire_inputs.push(Vec::new());
            table.wire_outputs.push(entry);

            let mut inputs = Vec::with_capacity(parts.len());
            for part in parts {
                inputs.push(entry_from_expr(part, table, interner, sink, anon_counter)?);
            }
            table.wire_inputs[wire_idx] = inputs;

            Some(entry)
        }
    }
}
