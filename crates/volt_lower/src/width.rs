//! Width inference over the symbol table.
//!
//! Propagates bit widths through identifiers, slices, and wires until every
//! symbol entry has a concrete width. Parts are processed in declaration
//! order; wires resolve recursively through other wires. Contradictions are
//! compile errors.

use volt_common::NameTable;
use volt_diagnostics::DiagnosticSink;
use volt_netlist::ModuleRegistry;

use crate::errors;
use crate::symbols::{SymAtom, SymbolTable};

/// Runs width inference to a fixed point.
///
/// On success every entry in the table has `width: Some(w)` with `w > 0`.
/// Returns `Err(())` if a width is contradictory, a referent is unknown, or
/// a wire depends on itself (diagnostics are emitted to the sink).
pub(crate) fn infer_widths(
    table: &mut SymbolTable,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
) -> Result<(), ()> {
    for part_idx in 0..table.parts.len() {
        infer_part(table, registry, interner, sink, part_idx)?;
    }

    let mut visiting = vec![false; table.wire_outputs.len()];
    for wire_idx in 0..table.wire_outputs.len() {
        infer_wire(table, registry, interner, sink, wire_idx, &mut visiting)?;
    }

    finalize(table, interner, sink)
}

/// Infers the widths of one part's argument and result entries from the
/// instantiated module's descriptor, cross-checking against the interface
/// and sibling parts.
fn infer_part(
    table: &mut SymbolTable,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
    part_idx: usize,
) -> Result<(), ()> {
    let desc_id = table.parts[part_idx].desc;

    // Result entries: unset widths come from the descriptor's output widths.
    for j in 0..table.part_outputs[part_idx].len() {
        let entry = table.part_outputs[part_idx][j];
        if entry.width.is_some() {
            continue;
        }
        let width = registry.get(desc_id).output_widths[j];
        table.part_outputs[part_idx][j].width = Some(width);

        // Cross-check against a module output of the same name.
        if let SymAtom::Name(name) = entry.atom {
            if let Some(idx) = table.find_output(name) {
                let declared = table.outputs[idx].width();
                if declared != width {
                    sink.emit(errors::error_width_mismatch(
                        format!(
                            "`{}` has width {width}, but the module output is declared \
                             with width {declared}",
                            interner.resolve(name)
                        ),
                        entry.span,
                    ));
                    return Err(());
                }
            }
        }
    }

    // Argument entries: unset widths come from the descriptor's input widths.
    for j in 0..table.part_inputs[part_idx].len() {
        let entry = table.part_inputs[part_idx][j];
        if entry.width.is_some() {
            continue;
        }
        let width = registry.get(desc_id).input_widths[j];
        table.part_inputs[part_idx][j].width = Some(width);

        let SymAtom::Name(name) = entry.atom else {
            continue;
        };

        // Cross-check against a sibling part's result of the same name.
        if let Some((sp, op)) = table.find_part_output(name) {
            let producer = registry.get(table.parts[sp].desc).output_widths[op];
            if producer != width {
                sink.emit(errors::error_width_mismatch(
                    format!(
                        "part expects input of width {width}, but `{}` has width {producer}",
                        interner.resolve(name)
                    ),
                    entry.span,
                ));
                return Err(());
            }
        }

        // Cross-check against a module input of the same name.
        if let Some(idx) = table.find_input(name) {
            let declared = table.inputs[idx].width();
            if declared != width {
                sink.emit(errors::error_width_mismatch(
                    format!(
                        "part expects input of width {width}, but `{}` is declared \
                         with width {declared}",
                        interner.resolve(name)
                    ),
                    entry.span,
                ));
                return Err(());
            }
        }
    }

    Ok(())
}

/// Infers the width of one wire: each input resolves to a referent, and the
/// output width is the sum of the input widths (concatenation).
///
/// Unknown input widths resolve by looking up, in order: module input,
/// sibling part result, the output of another wire (recursively), or a
/// constant literal (width 1).
fn infer_wire(
    table: &mut SymbolTable,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
    wire_idx: usize,
    visiting: &mut [bool],
) -> Result<(), ()> {
    if visiting[wire_idx] {
        let entry = table.wire_outputs[wire_idx];
        sink.emit(errors::error_wire_cycle(
            atom_name(entry.atom, interner),
            entry.span,
        ));
        return Err(());
    }
    visiting[wire_idx] = true;

    let mut total = 0u32;
    for j in 0..table.wire_inputs[wire_idx].len() {
        let entry = table.wire_inputs[wire_idx][j];
        if let Some(w) = entry.width {
            total += w;
            continue;
        }

        let width = match entry.atom {
            SymAtom::Const(_) => 1,
            SymAtom::Name(name) => {
                if let Some(idx) = table.find_input(name) {
                    table.inputs[idx].width()
                } else if let Some((sp, op)) = table.find_part_output(name) {
                    registry.get(table.parts[sp].desc).output_widths[op]
                } else if let Some(other) = table.find_wire(name) {
                    infer_wire(table, registry, interner, sink, other, visiting)?;
                    table.wire_outputs[other].width()
                } else {
                    sink.emit(errors::error_unknown_net(
                        interner.resolve(name),
                        entry.span,
                    ));
                    return Err(());
                }
            }
        };
        table.wire_inputs[wire_idx][j].width = Some(width);
        total += width;
    }

    // An unsliced wire output that names a module output is pinned to the
    // declared width.
    if table.wire_outputs[wire_idx].width.is_none() {
        if let SymAtom::Name(name) = table.wire_outputs[wire_idx].atom {
            if let Some(idx) = table.find_output(name) {
                table.wire_outputs[wire_idx].width = Some(table.outputs[idx].width());
            }
        }
    }

    let output = table.wire_outputs[wire_idx];
    if let Some(pinned) = output.width {
        if pinned != total {
            sink.emit(errors::error_width_mismatch(
                format!(
                    "wire `{}` is pinned to width {pinned}, but its inputs sum to {total}",
                    atom_name(output.atom, interner)
                ),
                output.span,
            ));
            return Err(());
        }
    } else {
        table.wire_outputs[wire_idx].width = Some(total);
    }

    visiting[wire_idx] = false;
    Ok(())
}

/// Verifies the fixed point: every entry has a known, positive width.
fn finalize(table: &SymbolTable, interner: &NameTable, sink: &DiagnosticSink) -> Result<(), ()> {
    let all = table
        .part_inputs
        .iter()
        .chain(&table.part_outputs)
        .chain(&table.wire_inputs)
        .flatten()
        .chain(&table.wire_outputs)
        .chain(&table.inputs)
        .chain(&table.outputs);

    for entry in all {
        match entry.width {
            Some(w) if w > 0 => {}
            _ => {
                sink.emit(errors::error_width_not_inferred(
                    atom_name(entry.atom, interner),
                    entry.span,
                ));
                return Err(());
            }
        }
    }
    Ok(())
}

fn atom_name(atom: SymAtom, interner: &NameTable) -> &str {
    match atom {
        SymAtom::Name(name) => interner.resolve(name),
        SymAtom::Const(false) => "0",
        SymAtom::Const(true) => "1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::build_symbol_table;
    use volt_diagnostics::DiagnosticSink;
    use volt_hdl_parser::{lexer, parser::HdlParser};
    use volt_source::FileId;

    fn infer(source: &str) -> (Option<SymbolTable>, NameTable, DiagnosticSink) {
        let interner = NameTable::new();
        let sink = DiagnosticSink::new();
        let file = FileId::from_raw(1);
        let tokens = lexer::lex(source, file, &sink);
        let mut parser = HdlParser::new(tokens, source, file, &interner, &sink);
        let ast = parser.parse_source_file();
        assert!(!sink.has_errors(), "parse errors: {:?}", sink.diagnostics());
        let registry = ModuleRegistry::with_builtins(&interner);
        let mut counter = 0;
        let Some(mut table) =
            build_symbol_table(&ast.modules[0], &registry, &interner, &sink, &mut counter)
        else {
            return (None, interner, sink);
        };
        let result = infer_widths(&mut table, &registry, &interner, &sink);
        (result.ok().map(|_| table), interner, sink)
    }

    #[test]
    fn bare_args_get_descriptor_widths() {
        let (table, _, _) = infer("module M(a) -> out { Nand(a, a) -> out }");
        let table = table.unwrap();
        assert_eq!(table.part_inputs[0][0].width, Some(1));
        assert_eq!(table.part_inputs[0][1].width, Some(1));
        assert_eq!(table.part_outputs[0][0].width, Some(1));
    }

    #[test]
    fn ram_widths_propagate() {
        let (table, _, _) = infer(
            "module M(data[16], load, addr[16]) -> out[16] {
                Ram64K(data, load, addr) -> out
            }",
        );
        let table = table.unwrap();
        assert_eq!(table.part_inputs[0][0].width, Some(16));
        assert_eq!(table.part_inputs[0][1].width, Some(1));
        assert_eq!(table.part_inputs[0][2].width, Some(16));
        assert_eq!(table.part_outputs[0][0].width, Some(16));
    }

    #[test]
    fn wire_width_is_sum_of_inputs() {
        let (table, _, _) = infer(
            "module M(a[4], b[4]) -> out[8] {
                { a, b } -> out
            }",
        );
        let table = table.unwrap();
        assert_eq!(table.wire_outputs[0].width, Some(8));
        assert_eq!(table.wire_inputs[0][0].width, Some(4));
    }

    #[test]
    fn wire_through_wire_resolves_recursively() {
        let (table, _, _) = infer(
            "module M(a[4]) -> out[5] {
                { w, 1 } -> out
                a -> w
            }",
        );
        let table = table.unwrap();
        // Wire 0 is { w, 1 }; its first input resolves through wire 1.
        assert_eq!(table.wire_outputs[0].width, Some(5));
        assert_eq!(table.wire_outputs[1].width, Some(4));
    }

    #[test]
    fn constants_in_wires_are_one_bit() {
        let (table, _, _) = infer(
            "module M(a) -> out[3] {
                { a, 0, 1 } -> out
            }",
        );
        let table = table.unwrap();
        assert_eq!(table.wire_outputs[0].width, Some(3));
    }

    #[test]
    fn mismatched_module_input_width_is_error() {
        // Nand expects 1-bit inputs; `a` is declared 8 bits wide.
        let (table, _, sink) = infer("module M(a[8]) -> out { Nand(a, a) -> out }");
        assert!(table.is_none());
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("declared with width 8")));
    }

    #[test]
    fn mismatched_wire_pin_is_error() {
        let (table, _, sink) = infer(
            "module M(a[4], b[4]) -> out[6] {
                { a, b } -> out
            }",
        );
        assert!(table.is_none());
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("pinned to width")));
    }

    #[test]
    fn unknown_net_in_wire_is_error() {
        let (table, _, sink) = infer(
            "module M(a) -> out[2] {
                { a, ghost } -> out
            }",
        );
        assert!(table.is_none());
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("not declared")));
    }

    #[test]
    fn wire_cycle_is_error() {
        let (table, _, sink) = infer(
            "module M(a) -> out {
                w -> x
                x -> w
                a -> out
            }",
        );
        assert!(table.is_none());
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("depends on itself")));
    }

    #[test]
    fn sliced_entries_keep_their_widths() {
        let (table, _, _) = infer("module M(a[8]) -> out { Nand(a[2], a[7]) -> out }");
        let table = table.unwrap();
        assert_eq!(table.part_inputs[0][0].width, Some(1));
        assert_eq!(table.part_inputs[0][0].offset, 2);
    }

    #[test]
    fn mismatched_sibling_output_width_is_error() {
        let (table, _, sink) = infer(
            "module M(data[16], load, addr[16]) -> out {
                Ram64K(data, load, addr) -> word
                Nand(word, load) -> out
            }",
        );
        assert!(table.is_none());
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("width 16")));
    }
}
