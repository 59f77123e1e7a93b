//! Connection lowering: flattening symbol entries into per-bit connection
//! lists and resolving the producer of every module output bit.
//!
//! For every part, in declaration order, its argument entries are walked in
//! order and each contributes `width` consecutive connection entries. The
//! receiving primitive binds its inputs by index, so this ordering is
//! load-bearing.

use volt_common::{Ident, NameTable};
use volt_diagnostics::DiagnosticSink;
use volt_netlist::{Connection, ModuleRegistry, OutputSource};
use volt_source::Span;

use crate::errors;
use crate::symbols::{SymAtom, SymEntry, SymbolTable};

/// The result of lowering one module's connections.
pub(crate) struct LoweredConnections {
    /// One connection list per part, one entry per part input bit.
    pub part_connections: Vec<Vec<Connection>>,
    /// The producer of every module output bit.
    pub outputs: Vec<OutputSource>,
}

/// Lowers all part connections and module outputs for one module.
///
/// Requires width inference to have completed. Returns `Err(())` if any
/// resolution, bounds, or driver check fails.
pub(crate) fn lower_connections(
    table: &SymbolTable,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
) -> Result<LoweredConnections, ()> {
    let mut part_connections = Vec::with_capacity(table.parts.len());
    for part_idx in 0..table.parts.len() {
        part_connections.push(lower_part(table, registry, interner, sink, part_idx)?);
    }

    let outputs = lower_outputs(table, registry, interner, sink)?;

    Ok(LoweredConnections {
        part_connections,
        outputs,
    })
}

/// Lowers one part's argument entries into its flat connection list.
fn lower_part(
    table: &SymbolTable,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
    part_idx: usize,
) -> Result<Vec<Connection>, ()> {
    let desc = registry.get(table.parts[part_idx].desc);
    let mut conns = Vec::with_capacity(desc.input_count() as usize);

    for (j, entry) in table.part_inputs[part_idx].iter().enumerate() {
        let width = entry.width();

        // Every argument entry must match the parameter width exactly; this
        // is what guarantees the connection list has one entry per input bit.
        if width != desc.input_widths[j] {
            sink.emit(errors::error_width_mismatch(
                format!(
                    "argument {} of `{}` expects width {}, got {width}",
                    j + 1,
                    interner.resolve(desc.name),
                    desc.input_widths[j],
                ),
                entry.span,
            ));
            return Err(());
        }

        append_entry_bits(table, registry, interner, sink, entry, &mut conns)?;
    }

    debug_assert_eq!(conns.len(), desc.input_count() as usize);
    Ok(conns)
}

/// Appends the `width` connection entries one symbol entry expands to.
fn append_entry_bits(
    table: &SymbolTable,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
    entry: &SymEntry,
    conns: &mut Vec<Connection>,
) -> Result<(), ()> {
    let width = entry.width();

    let name = match entry.atom {
        SymAtom::Const(value) => {
            for _ in 0..width {
                conns.push(Connection::Constant { value });
            }
            return Ok(());
        }
        SymAtom::Name(name) => name,
    };

    if let Some(idx) = table.find_input(name) {
        check_slice(entry, name, table.inputs[idx].width(), interner, sink)?;
        let base = table.input_bit_offset(idx) + entry.offset;
        for k in 0..width {
            conns.push(Connection::External { bit: base + k });
        }
        return Ok(());
    }

    if let Some((sp, op)) = table.find_part_output(name) {
        let producer = registry.get(table.parts[sp].desc);
        check_slice(entry, name, producer.output_widths[op], interner, sink)?;
        let base = producer.output_bit_offset(op) + entry.offset;
        for k in 0..width {
            conns.push(Connection::Internal {
                part: sp as u32,
                bit: base + k,
            });
        }
        return Ok(());
    }

    if let Some(wire_idx) = table.find_wire(name) {
        let bits = wire_bits(table, registry, interner, sink, wire_idx)?;
        check_slice(entry, name, bits.len() as u32, interner, sink)?;
        let start = entry.offset as usize;
        conns.extend_from_slice(&bits[start..start + width as usize]);
        return Ok(());
    }

    sink.emit(errors::error_unknown_net(interner.resolve(name), entry.span));
    Err(())
}

/// Flattens one wire into its full per-bit connection list, resolving
/// recursively through nested wires.
fn wire_bits(
    table: &SymbolTable,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
    wire_idx: usize,
) -> Result<Vec<Connection>, ()> {
    let mut bits = Vec::with_capacity(table.wire_outputs[wire_idx].width() as usize);
    for entry in &table.wire_inputs[wire_idx] {
        append_entry_bits(table, registry, interner, sink, entry, &mut bits)?;
    }
    Ok(bits)
}

/// Verifies that an entry's slice stays within its referent's width.
fn check_slice(
    entry: &SymEntry,
    name: Ident,
    referent_width: u32,
    interner: &NameTable,
    sink: &DiagnosticSink,
) -> Result<(), ()> {
    let end = entry.offset + entry.width();
    if end > referent_width {
        sink.emit(errors::error_slice_out_of_range(
            interner.resolve(name),
            end - 1,
            referent_width,
            entry.span,
        ));
        return Err(());
    }
    Ok(())
}

/// Resolves the producer of every module output bit.
///
/// Part results that name a module output claim output bits directly; wires
/// whose output names a module output are flattened and claimed bit by bit.
/// Every bit must end up with exactly one producer.
fn lower_outputs(
    table: &SymbolTable,
    registry: &ModuleRegistry,
    interner: &NameTable,
    sink: &DiagnosticSink,
) -> Result<Vec<OutputSource>, ()> {
    let out_count = table.output_count() as usize;
    let mut outputs: Vec<Option<OutputSource>> = vec![None; out_count];

    // Part results driving module outputs.
    for (part_idx, results) in table.part_outputs.iter().enumerate() {
        let desc = registry.get(table.parts[part_idx].desc);
        for (j, entry) in results.iter().enumerate() {
            let SymAtom::Name(name) = entry.atom else {
                continue;
            };
            let Some(idx) = table.find_output(name) else {
                continue;
            };

            let width = entry.width();
            if width > desc.output_widths[j] {
                sink.emit(errors::error_width_mismatch(
                    format!(
                        "result {} of `{}` is only {} bits wide, but {width} were bound",
                        j + 1,
                        interner.resolve(desc.name),
                        desc.output_widths[j],
                    ),
                    entry.span,
                ));
                return Err(());
            }
            check_slice(entry, name, table.outputs[idx].width(), interner, sink)?;

            let src_base = desc.output_bit_offset(j);
            let dst_base = table.output_bit_offset(idx) + entry.offset;
            for k in 0..width {
                claim_output(
                    &mut outputs,
                    dst_base + k,
                    OutputSource::Part {
                        part: part_idx as u32,
                        bit: src_base + k,
                    },
                    name,
                    entry.span,
                    table,
                    interner,
                    sink,
                )?;
            }
        }
    }

    // Wires driving module outputs.
    for (wire_idx, entry) in table.wire_outputs.iter().enumerate() {
        let SymAtom::Name(name) = entry.atom else {
            continue;
        };
        let Some(idx) = table.find_output(name) else {
            continue;
        };

        check_slice(entry, name, table.outputs[idx].width(), interner, sink)?;
        let bits = wire_bits(table, registry, interner, sink, wire_idx)?;
        let dst_base = table.output_bit_offset(idx) + entry.offset;

        for (k, conn) in bits.iter().enumerate() {
            let source = match *conn {
                Connection::Internal { part, bit } => OutputSource::Part { part, bit },
                Connection::Constant { value } => OutputSource::Constant { value },
                Connection::External { .. } => {
                    sink.emit(errors::error_input_drives_output(
                        interner.resolve(name),
                        entry.span,
                    ));
                    return Err(());
                }
            };
            claim_output(
                &mut outputs,
                dst_base + k as u32,
                source,
                name,
                entry.span,
                table,
                interner,
                sink,
            )?;
        }
    }

    // Every output bit must have a producer.
    for (bit, slot) in outputs.iter().enumerate() {
        if slot.is_none() {
            let (name, local_bit) = output_bit_name(table, bit as u32);
            sink.emit(errors::error_output_not_driven(
                interner.resolve(name),
                local_bit,
                table.outputs[table.find_output(name).unwrap_or(0)].span,
            ));
            return Err(());
        }
    }

    Ok(outputs.into_iter().map(|s| s.unwrap()).collect())
}

/// Records a producer for one output bit, rejecting double drivers.
#[allow(clippy::too_many_arguments)]
fn claim_output(
    outputs: &mut [Option<OutputSource>],
    bit: u32,
    source: OutputSource,
    name: Ident,
    span: Span,
    table: &SymbolTable,
    interner: &NameTable,
    sink: &DiagnosticSink,
) -> Result<(), ()> {
    let slot = &mut outputs[bit as usize];
    if slot.is_some() {
        let (_, local_bit) = output_bit_name(table, bit);
        sink.emit(errors::error_output_multiply_driven(
            interner.resolve(name),
            local_bit,
            span,
        ));
        return Err(());
    }
    *slot = Some(source);
    Ok(())
}

/// Maps an absolute output bit back to its parameter name and local bit index.
fn output_bit_name(table: &SymbolTable, bit: u32) -> (Ident, u32) {
    let mut offset = 0;
    for entry in &table.outputs {
        let width = entry.width();
        if bit < offset + width {
            if let SymAtom::Name(name) = entry.atom {
                return (name, bit - offset);
            }
        }
        offset += width;
    }
    // Unreachable for in-range bits; fall back to the last output.
    match table.outputs.last().map(|e| e.atom) {
        Some(SymAtom::Name(name)) => (name, bit),
        _ => (Ident::from_raw(0), bit),
    }
}
