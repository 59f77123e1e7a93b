//! The public simulation driver: instance inputs/outputs, the half-clock
//! step engine, and named submodule state inspection.

use volt_common::NameTable;
use volt_netlist::{DescId, ModuleRegistry};

use crate::build::{self, PartRecord};
use crate::error::SimError;
use crate::node::{NetGraph, NodeId, RamId, RAM_BYTES, RAM_STATE_COUNT};

/// The state backing one labeled submodule.
enum SubmoduleKind {
    /// A range of flip-flops in the graph's sequential-node list.
    Registers { seq_start: usize, seq_len: usize },
    /// A directly instantiated RAM block.
    Ram { ram: RamId },
}

/// One labeled submodule with its externally visible state buffer.
struct Submodule {
    label: String,
    kind: SubmoduleKind,
    states: Vec<bool>,
}

/// A simulator instance: one expanded module, steppable one half-clock at a
/// time.
///
/// Host-set input bits propagate at the start of each [`step`](Self::step);
/// output bits are refreshed at its end. Labeled submodules expose their
/// stored state through [`submodule_states`](Self::submodule_states) and may
/// be rewritten through [`submodule_states_mut`](Self::submodule_states_mut)
/// before the next step.
pub struct Simulation {
    graph: NetGraph,
    inputs: Vec<bool>,
    outputs: Vec<bool>,
    input_nodes: Vec<NodeId>,
    output_nodes: Vec<NodeId>,
    submodules: Vec<Submodule>,
}

impl Simulation {
    /// Expands the named module into a fresh simulator instance.
    ///
    /// The clock starts low, so the first step is a rising edge. All
    /// flip-flops and RAM contents start at zero.
    pub fn new(
        registry: &ModuleRegistry,
        interner: &NameTable,
        top: &str,
    ) -> Result<Self, SimError> {
        let desc_id = interner_lookup(registry, interner, top)
            .ok_or_else(|| SimError::UnknownModule(top.to_string()))?;
        let desc = registry.get(desc_id);

        let input_count = desc.input_count() as usize;
        let output_count = desc.output_count() as usize;

        // Instance inputs are extra constant nodes beyond the compiled node
        // count; 3 more cover the shared constants and the clock.
        let mut graph =
            NetGraph::with_capacity(desc.node_count as usize + input_count, desc.dff_count as usize);

        let (built, part_records) = build::build_top(&mut graph, registry, desc_id);

        let input_nodes: Vec<NodeId> = (0..input_count).map(|_| graph.new_constant(false)).collect();
        for (bit, slots) in built.sinks.into_iter().enumerate() {
            if slots.len() != desc.sink_counts[bit] as usize {
                return Err(SimError::Internal(format!(
                    "input bit {bit} collected {} sinks, expected {}",
                    slots.len(),
                    desc.sink_counts[bit]
                )));
            }
            for slot in slots {
                graph.bind(slot, input_nodes[bit]);
            }
        }

        graph.validate()?;

        let submodules = collect_submodules(&graph, registry, desc_id, &part_records, interner)?;

        Ok(Self {
            graph,
            inputs: vec![false; input_count],
            outputs: vec![false; output_count],
            input_nodes,
            output_nodes: built.outputs,
            submodules,
        })
    }

    /// The number of instance input bits.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// The number of instance output bits.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Sets one input bit, effective from the next step.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn set_input(&mut self, idx: usize, value: bool) {
        self.inputs[idx] = value;
    }

    /// Sets the leading input bits from a slice, LSB-first.
    ///
    /// # Panics
    ///
    /// Panics if `values` is longer than the input count.
    pub fn set_inputs(&mut self, values: &[bool]) {
        self.inputs[..values.len()].copy_from_slice(values);
    }

    /// Reads one output bit as of the last step.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn output(&self, idx: usize) -> bool {
        self.outputs[idx]
    }

    /// All output bits as of the last step, LSB-first per parameter.
    pub fn outputs(&self) -> &[bool] {
        &self.outputs
    }

    /// The current clock level.
    pub fn clock(&self) -> bool {
        self.graph.clock_level()
    }

    /// Advances one half-clock and returns the new clock level (`true` on
    /// the rising-edge step).
    ///
    /// In order: host-set inputs propagate, host-written submodule state
    /// loads into the flip-flops and RAM arrays, the clock toggles, the
    /// rising-edge pass runs (on a rising edge only), the combinational pass
    /// refreshes the outputs, and submodule state mirrors back out.
    pub fn step(&mut self) -> bool {
        for (node, &value) in self.input_nodes.iter().zip(&self.inputs) {
            self.graph.set_constant(*node, value);
        }

        self.load_submodule_states();

        let high = self.graph.toggle_clock();
        self.graph.clear_visited();

        if high {
            self.graph.rising_edge_pass();
        }

        for k in 0..self.output_nodes.len() {
            let value = self.graph.eval_comb(self.output_nodes[k]);
            self.outputs[k] = value;
        }

        self.mirror_submodule_states();

        high
    }

    /// Read access to a labeled submodule's state buffer.
    ///
    /// For an N-bit register, bit `i` of the register is `states[i]`. For a
    /// RAM, byte `b` of the data array has bit `i` at `states[8 * b + i]`.
    pub fn submodule_states(&self, label: &str) -> Result<&[bool], SimError> {
        self.submodules
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.states.as_slice())
            .ok_or_else(|| SimError::UnknownSubmodule(label.to_string()))
    }

    /// Write access to a labeled submodule's state buffer; the contents are
    /// loaded into the simulated state at the start of the next step.
    pub fn submodule_states_mut(&mut self, label: &str) -> Result<&mut [bool], SimError> {
        self.submodules
            .iter_mut()
            .find(|s| s.label == label)
            .map(|s| s.states.as_mut_slice())
            .ok_or_else(|| SimError::UnknownSubmodule(label.to_string()))
    }

    /// Loads every labeled submodule's state buffer into the graph.
    fn load_submodule_states(&mut self) {
        for sub in &self.submodules {
            match sub.kind {
                SubmoduleKind::Registers { seq_start, seq_len } => {
                    for j in 0..seq_len {
                        let id = self.graph.seq_node(seq_start + j);
                        self.graph.set_dff_state(id, sub.states[j]);
                    }
                }
                SubmoduleKind::Ram { ram } => {
                    let data = self.graph.ram_data_mut(ram);
                    for (b, byte) in data.iter_mut().enumerate().take(RAM_BYTES) {
                        let mut packed = 0u8;
                        for i in 0..8 {
                            if sub.states[8 * b + i] {
                                packed |= 1 << i;
                            }
                        }
                        *byte = packed;
                    }
                }
            }
        }
    }

    /// Mirrors the graph's sequential state back into every labeled
    /// submodule's buffer.
    fn mirror_submodule_states(&mut self) {
        for sub in &mut self.submodules {
            match sub.kind {
                SubmoduleKind::Registers { seq_start, seq_len } => {
                    for j in 0..seq_len {
                        let id = self.graph.seq_node(seq_start + j);
                        if let Some(state) = self.graph.dff_last_state(id) {
                            sub.states[j] = state;
                        }
                    }
                }
                SubmoduleKind::Ram { ram } => {
                    let data = self.graph.ram_data(ram);
                    for (b, byte) in data.iter().enumerate().take(RAM_BYTES) {
                        for i in 0..8 {
                            sub.states[8 * b + i] = (byte >> i) & 1 == 1;
                        }
                    }
                }
            }
        }
    }
}

/// Builds the labeled-submodule records for the top module's direct parts.
fn collect_submodules(
    graph: &NetGraph,
    registry: &ModuleRegistry,
    desc_id: DescId,
    part_records: &[PartRecord],
    interner: &NameTable,
) -> Result<Vec<Submodule>, SimError> {
    let desc = registry.get(desc_id);
    let mut submodules = Vec::new();

    for (part, record) in desc.parts.iter().zip(part_records) {
        let Some(label) = part.label else {
            continue;
        };
        let label = interner.resolve(label).to_string();

        let kind = if registry.get(part.desc).is_ram64k() {
            // The RAM's sequential range holds its 16 output taps; any of
            // them identifies the block.
            let first = graph.seq_node(record.seq_start);
            let ram = graph.ram_of(first).ok_or_else(|| {
                SimError::Internal(format!("labeled RAM `{label}` has no output taps"))
            })?;
            SubmoduleKind::Ram { ram }
        } else {
            SubmoduleKind::Registers {
                seq_start: record.seq_start,
                seq_len: record.seq_len,
            }
        };

        let state_count = match kind {
            SubmoduleKind::Ram { .. } => RAM_STATE_COUNT,
            SubmoduleKind::Registers { seq_len, .. } => seq_len,
        };

        submodules.push(Submodule {
            label,
            kind,
            states: vec![false; state_count],
        });
    }

    Ok(submodules)
}

/// Finds the descriptor for a host-supplied module name. Uses the
/// non-interning lookup so asking for a module that was never declared
/// does not grow the name table.
fn interner_lookup(
    registry: &ModuleRegistry,
    interner: &NameTable,
    name: &str,
) -> Option<DescId> {
    registry.lookup(interner.get(name)?)
}
