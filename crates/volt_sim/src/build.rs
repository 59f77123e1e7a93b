//! Recursive instantiation of a module descriptor into the flat node graph.
//!
//! Each module builds its parts first, then walks the per-part connection
//! lists: internal connections bind child sinks to sibling outputs
//! immediately, constants bind to the shared constant nodes, and external
//! connections propagate the child's sink slots up into the enclosing
//! module's own sink lists, to be bound by *its* caller.

use volt_netlist::{Connection, DescId, ModuleRegistry, OutputSource, Primitive};

use crate::node::{NetGraph, NodeId, Slot};

/// The outcome of instantiating one module: its input sink lists (one per
/// input bit) and its output nodes (one per output bit).
pub(crate) struct BuiltModule {
    /// Per input bit: the primitive input slots that must be pointed at
    /// whichever node the caller supplies for that bit.
    pub sinks: Vec<Vec<Slot>>,
    /// Per output bit: the node producing it.
    pub outputs: Vec<NodeId>,
}

/// The sequential-node range one top-level part occupies, recorded for
/// submodule state inspection.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PartRecord {
    /// First index into the graph's sequential-node list.
    pub seq_start: usize,
    /// Number of sequential nodes in the part's subtree.
    pub seq_len: usize,
}

/// Instantiates `desc_id`, recording the sequential range of each direct
/// part for state inspection.
pub(crate) fn build_top(
    graph: &mut NetGraph,
    registry: &ModuleRegistry,
    desc_id: DescId,
) -> (BuiltModule, Vec<PartRecord>) {
    let mut records = Vec::new();
    let built = build_module(graph, registry, desc_id, Some(&mut records));
    (built, records)
}

/// Recursively instantiates one module.
fn build_module(
    graph: &mut NetGraph,
    registry: &ModuleRegistry,
    desc_id: DescId,
    mut part_records: Option<&mut Vec<PartRecord>>,
) -> BuiltModule {
    let desc = registry.get(desc_id);

    match desc.primitive {
        Some(Primitive::Nand) => {
            let node = graph.new_nand();
            BuiltModule {
                sinks: vec![vec![Slot::NandA(node)], vec![Slot::NandB(node)]],
                outputs: vec![node],
            }
        }
        Some(Primitive::Dff) => {
            let node = graph.new_dff();
            BuiltModule {
                sinks: vec![vec![Slot::DffInput(node)]],
                outputs: vec![node],
            }
        }
        Some(Primitive::Ram64k) => {
            let ram = graph.new_ram();
            let mut sinks = Vec::with_capacity(33);
            for bit in 0..16u8 {
                sinks.push(vec![Slot::RamData(ram, bit)]);
            }
            sinks.push(vec![Slot::RamLoad(ram)]);
            for bit in 0..16u8 {
                sinks.push(vec![Slot::RamAddr(ram, bit)]);
            }
            BuiltModule {
                sinks,
                outputs: graph.ram_outputs(ram).to_vec(),
            }
        }
        None => {
            let mut children = Vec::with_capacity(desc.parts.len());
            for part in &desc.parts {
                let seq_start = graph.seq_len();
                let child = build_module(graph, registry, part.desc, None);
                if let Some(records) = part_records.as_mut() {
                    records.push(PartRecord {
                        seq_start,
                        seq_len: graph.seq_len() - seq_start,
                    });
                }
                children.push(child);
            }

            let mut sinks: Vec<Vec<Slot>> = desc
                .sink_counts
                .iter()
                .map(|&count| Vec::with_capacity(count as usize))
                .collect();

            for (part_idx, conns) in desc.part_connections.iter().enumerate() {
                let child_sinks = std::mem::take(&mut children[part_idx].sinks);
                debug_assert_eq!(child_sinks.len(), conns.len());
                for (slots, conn) in child_sinks.into_iter().zip(conns) {
                    match *conn {
                        Connection::Internal { part, bit } => {
                            let source = children[part as usize].outputs[bit as usize];
                            for slot in slots {
                                graph.bind(slot, source);
                            }
                        }
                        Connection::Constant { value } => {
                            let source = graph.constant_for(value);
                            for slot in slots {
                                graph.bind(slot, source);
                            }
                        }
                        Connection::External { bit } => {
                            sinks[bit as usize].extend(slots);
                        }
                    }
                }
            }

            let outputs = desc
                .outputs
                .iter()
                .map(|source| match *source {
                    OutputSource::Part { part, bit } => {
                        children[part as usize].outputs[bit as usize]
                    }
                    OutputSource::Constant { value } => graph.constant_for(value),
                })
                .collect();

            BuiltModule { sinks, outputs }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volt_common::NameTable;
    use volt_netlist::ModuleRegistry;

    fn builtin(registry: &ModuleRegistry, interner: &NameTable, name: &str) -> DescId {
        registry.lookup(interner.intern(name)).unwrap()
    }

    #[test]
    fn nand_primitive_shape() {
        let interner = NameTable::new();
        let registry = ModuleRegistry::with_builtins(&interner);
        let mut graph = NetGraph::with_capacity(4, 0);

        let (built, records) = build_top(&mut graph, &registry, builtin(&registry, &interner, "Nand"));
        assert_eq!(built.sinks.len(), 2);
        assert_eq!(built.sinks[0].len(), 1);
        assert_eq!(built.outputs.len(), 1);
        assert!(records.is_empty());
    }

    #[test]
    fn ram_primitive_shape() {
        let interner = NameTable::new();
        let registry = ModuleRegistry::with_builtins(&interner);
        let mut graph = NetGraph::with_capacity(20, 16);

        let (built, _) = build_top(&mut graph, &registry, builtin(&registry, &interner, "Ram64K"));
        assert_eq!(built.sinks.len(), 33);
        assert_eq!(built.outputs.len(), 16);
        assert_eq!(graph.seq_len(), 16);
    }

    #[test]
    fn dff_registers_as_sequential() {
        let interner = NameTable::new();
        let registry = ModuleRegistry::with_builtins(&interner);
        let mut graph = NetGraph::with_capacity(4, 1);

        let (_, _) = build_top(&mut graph, &registry, builtin(&registry, &interner, "Dff"));
        assert_eq!(graph.seq_len(), 1);
    }
}
