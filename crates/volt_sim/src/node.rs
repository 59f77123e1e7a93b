//! The flat node graph: arena, slot binding, and the two evaluation passes.
//!
//! Nodes are stable indices into a flat arena; `Nand` inputs, `Dff` inputs,
//! and RAM ports hold node indices, never owning references. Sequential
//! feedback (a flip-flop output feeding its own combinational cone) is just
//! a cycle of indices, which the memoised evaluators handle naturally.

use crate::error::SimError;

/// Bytes in one RAM block: 16-bit words at byte addresses.
pub(crate) const RAM_BYTES: usize = 65536;

/// Booleans in a RAM block's externally visible state buffer (LSB-first
/// packing, 8 per byte).
pub(crate) const RAM_STATE_COUNT: usize = RAM_BYTES * 8;

/// Index of a node in the graph arena.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// Sentinel for an input slot not yet bound during instantiation.
    pub const UNBOUND: NodeId = NodeId(u32::MAX);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a RAM block in the graph.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct RamId(u32);

impl RamId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The node variants the simulator evaluates directly.
#[derive(Clone, Copy, Debug)]
pub(crate) enum NodeKind {
    /// A constant bit (also used for instance inputs and the clock).
    Constant { value: bool },
    /// A two-input NAND gate.
    Nand { a: NodeId, b: NodeId },
    /// A D flip-flop; readers see `last_state`, the rising edge samples
    /// `input` into the cache before committing.
    Dff { input: NodeId, last_state: bool },
    /// One output bit of a RAM block.
    RamOut { ram: RamId, bit: u8 },
}

/// One node with its per-step scratch state.
pub(crate) struct Node {
    pub kind: NodeKind,
    /// Per-step memoisation flag.
    pub visited: bool,
    /// Value memoised this step.
    pub cached: bool,
}

/// One 64K-byte RAM block and its port bindings.
pub(crate) struct RamBlock {
    /// Packed data, 16-bit words at byte addresses, little-endian.
    pub data: Vec<u8>,
    /// The 16 data input nodes.
    pub inputs: [NodeId; 16],
    /// The load input node.
    pub load: NodeId,
    /// The 16 address input nodes.
    pub addrs: [NodeId; 16],
    /// The 16 output tap nodes, one per word bit.
    pub outputs: [NodeId; 16],
}

/// A pointer to one primitive input slot, late-bound during instantiation.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Slot {
    /// The `a` input of a NAND node.
    NandA(NodeId),
    /// The `b` input of a NAND node.
    NandB(NodeId),
    /// The input of a flip-flop node.
    DffInput(NodeId),
    /// Data bit `n` of a RAM block.
    RamData(RamId, u8),
    /// The load line of a RAM block.
    RamLoad(RamId),
    /// Address bit `n` of a RAM block.
    RamAddr(RamId, u8),
}

/// The flat graph of primitive nodes backing one simulation instance.
pub(crate) struct NetGraph {
    nodes: Vec<Node>,
    rams: Vec<RamBlock>,
    /// Flip-flops and RAM output taps, in creation order. Kept separately so
    /// the rising-edge pass and state inspection iterate only sequential
    /// state.
    seq_nodes: Vec<NodeId>,
    const0: NodeId,
    const1: NodeId,
    clock: NodeId,
}

impl NetGraph {
    /// Creates a graph pre-sized for `node_capacity` nodes and
    /// `seq_capacity` sequential nodes, with the two shared constants and
    /// the clock already allocated. The clock starts low so the first step
    /// is a rising edge.
    pub fn with_capacity(node_capacity: usize, seq_capacity: usize) -> Self {
        let mut graph = Self {
            nodes: Vec::with_capacity(node_capacity + 3),
            rams: Vec::new(),
            seq_nodes: Vec::with_capacity(seq_capacity),
            const0: NodeId::UNBOUND,
            const1: NodeId::UNBOUND,
            clock: NodeId::UNBOUND,
        };
        graph.const0 = graph.new_constant(false);
        graph.const1 = graph.new_constant(true);
        graph.clock = graph.new_constant(false);
        graph
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            visited: false,
            cached: false,
        });
        id
    }

    /// Allocates a constant node.
    pub fn new_constant(&mut self, value: bool) -> NodeId {
        self.push(NodeKind::Constant { value })
    }

    /// Allocates a NAND node with unbound inputs.
    pub fn new_nand(&mut self) -> NodeId {
        self.push(NodeKind::Nand {
            a: NodeId::UNBOUND,
            b: NodeId::UNBOUND,
        })
    }

    /// Allocates a flip-flop node with an unbound input and registers it in
    /// the sequential list.
    pub fn new_dff(&mut self) -> NodeId {
        let id = self.push(NodeKind::Dff {
            input: NodeId::UNBOUND,
            last_state: false,
        });
        self.seq_nodes.push(id);
        id
    }

    /// Allocates a RAM block with its 16 output tap nodes, all registered in
    /// the sequential list.
    pub fn new_ram(&mut self) -> RamId {
        let ram = RamId(self.rams.len() as u32);
        let mut outputs = [NodeId::UNBOUND; 16];
        for (bit, out) in outputs.iter_mut().enumerate() {
            let id = self.push(NodeKind::RamOut {
                ram,
                bit: bit as u8,
            });
            self.seq_nodes.push(id);
            *out = id;
        }
        self.rams.push(RamBlock {
            data: vec![0; RAM_BYTES],
            inputs: [NodeId::UNBOUND; 16],
            load: NodeId::UNBOUND,
            addrs: [NodeId::UNBOUND; 16],
            outputs,
        });
        ram
    }

    /// The RAM block a node belongs to, if it is a RAM output tap.
    pub fn ram_of(&self, id: NodeId) -> Option<RamId> {
        match self.nodes[id.index()].kind {
            NodeKind::RamOut { ram, .. } => Some(ram),
            _ => None,
        }
    }

    /// The 16 output tap nodes of a RAM block.
    pub fn ram_outputs(&self, ram: RamId) -> [NodeId; 16] {
        self.rams[ram.index()].outputs
    }

    /// The packed data array of a RAM block.
    pub fn ram_data(&self, ram: RamId) -> &[u8] {
        &self.rams[ram.index()].data
    }

    /// Mutable access to the packed data array of a RAM block.
    pub fn ram_data_mut(&mut self, ram: RamId) -> &mut [u8] {
        &mut self.rams[ram.index()].data
    }

    /// Points one primitive input slot at `source`.
    pub fn bind(&mut self, slot: Slot, source: NodeId) {
        match slot {
            Slot::NandA(id) => {
                if let NodeKind::Nand { a, .. } = &mut self.nodes[id.index()].kind {
                    *a = source;
                }
            }
            Slot::NandB(id) => {
                if let NodeKind::Nand { b, .. } = &mut self.nodes[id.index()].kind {
                    *b = source;
                }
            }
            Slot::DffInput(id) => {
                if let NodeKind::Dff { input, .. } = &mut self.nodes[id.index()].kind {
                    *input = source;
                }
            }
            Slot::RamData(ram, bit) => self.rams[ram.index()].inputs[bit as usize] = source,
            Slot::RamLoad(ram) => self.rams[ram.index()].load = source,
            Slot::RamAddr(ram, bit) => self.rams[ram.index()].addrs[bit as usize] = source,
        }
    }

    /// Overwrites a constant node's value (instance inputs, clock).
    pub fn set_constant(&mut self, id: NodeId, value: bool) {
        if let NodeKind::Constant { value: v } = &mut self.nodes[id.index()].kind {
            *v = value;
        }
    }

    /// The shared constant node for `value`.
    pub fn constant_for(&self, value: bool) -> NodeId {
        if value {
            self.const1
        } else {
            self.const0
        }
    }

    /// The current clock level.
    pub fn clock_level(&self) -> bool {
        match self.nodes[self.clock.index()].kind {
            NodeKind::Constant { value } => value,
            _ => false,
        }
    }

    /// Toggles the clock, returning the new level.
    pub fn toggle_clock(&mut self) -> bool {
        let level = !self.clock_level();
        self.set_constant(self.clock, level);
        level
    }

    /// The number of sequential nodes created so far.
    pub fn seq_len(&self) -> usize {
        self.seq_nodes.len()
    }

    /// The sequential node at creation index `idx`.
    pub fn seq_node(&self, idx: usize) -> NodeId {
        self.seq_nodes[idx]
    }

    /// A flip-flop node's stored state, or `None` for RAM output taps.
    pub fn dff_last_state(&self, id: NodeId) -> Option<bool> {
        match self.nodes[id.index()].kind {
            NodeKind::Dff { last_state, .. } => Some(last_state),
            _ => None,
        }
    }

    /// Overwrites a flip-flop's stored state (host-written submodule state).
    /// Ignored for non-flip-flop nodes.
    pub fn set_dff_state(&mut self, id: NodeId, value: bool) {
        let node = &mut self.nodes[id.index()];
        if let NodeKind::Dff { last_state, .. } = &mut node.kind {
            *last_state = value;
            node.cached = value;
        }
    }

    /// Verifies that every input slot was bound exactly once during
    /// instantiation (the construction invariant).
    pub fn validate(&self) -> Result<(), SimError> {
        for (idx, node) in self.nodes.iter().enumerate() {
            match node.kind {
                NodeKind::Nand { a, b } => {
                    if a == NodeId::UNBOUND || b == NodeId::UNBOUND {
                        return Err(SimError::Internal(format!(
                            "nand node {idx} has an unbound input slot"
                        )));
                    }
                }
                NodeKind::Dff { input, .. } => {
                    if input == NodeId::UNBOUND {
                        return Err(SimError::Internal(format!(
                            "flip-flop node {idx} has an unbound input slot"
                        )));
                    }
                }
                _ => {}
            }
        }
        for (idx, ram) in self.rams.iter().enumerate() {
            let unbound = ram.load == NodeId::UNBOUND
                || ram.inputs.contains(&NodeId::UNBOUND)
                || ram.addrs.contains(&NodeId::UNBOUND);
            if unbound {
                return Err(SimError::Internal(format!(
                    "ram block {idx} has an unbound port"
                )));
            }
        }
        Ok(())
    }

    /// Clears every node's per-step memoisation flag.
    pub fn clear_visited(&mut self) {
        for node in &mut self.nodes {
            node.visited = false;
        }
    }

    /// Clears the memoisation flag of every non-flip-flop node. Flip-flops
    /// stay visited between edge-pass roots so they keep answering with
    /// their pre-commit state.
    fn clear_comb_visited(&mut self) {
        for node in &mut self.nodes {
            if !matches!(node.kind, NodeKind::Dff { .. }) {
                node.visited = false;
            }
        }
    }

    // ========================================================================
    // Combinational pass
    // ========================================================================

    /// Evaluates a node combinationally, memoised per step.
    ///
    /// Flip-flops answer with their committed state; RAM output taps read
    /// the word at the current address, refreshing all 16 sibling taps in
    /// one shot.
    pub fn eval_comb(&mut self, id: NodeId) -> bool {
        let node = &self.nodes[id.index()];
        if let NodeKind::Dff { last_state, .. } = node.kind {
            return last_state;
        }
        if node.visited {
            return node.cached;
        }
        let kind = node.kind;
        self.nodes[id.index()].visited = true;

        let value = match kind {
            NodeKind::Constant { value } => value,
            NodeKind::Nand { a, b } => {
                let left = self.eval_comb(a);
                let right = self.eval_comb(b);
                !(left && right)
            }
            NodeKind::RamOut { ram, bit } => {
                let addrs = self.rams[ram.index()].addrs;
                let addr = self.eval_word_comb(&addrs);
                let word = self.ram_read(ram, addr);
                self.latch_ram_outputs(ram, word);
                (word >> bit) & 1 == 1
            }
            // Handled above.
            NodeKind::Dff { .. } => unreachable!("flip-flops short-circuit"),
        };

        self.nodes[id.index()].cached = value;
        value
    }

    fn eval_word_comb(&mut self, bits: &[NodeId; 16]) -> u16 {
        let mut word = 0u16;
        for (i, &bit) in bits.iter().enumerate() {
            if self.eval_comb(bit) {
                word |= 1 << i;
            }
        }
        word
    }

    // ========================================================================
    // Rising-edge pass
    // ========================================================================

    /// Runs the rising-edge pass: evaluates every sequential node against
    /// the previous edge's stored values, then commits all flip-flops at
    /// once.
    pub fn rising_edge_pass(&mut self) {
        for i in 0..self.seq_nodes.len() {
            let id = self.seq_nodes[i];
            self.nodes[id.index()].visited = false;
            self.eval_edge(id, true);
            self.clear_comb_visited();
        }
        // Commit: every flip-flop's sampled value becomes its stored state.
        for i in 0..self.seq_nodes.len() {
            let id = self.seq_nodes[i];
            let cached = self.nodes[id.index()].cached;
            if let NodeKind::Dff { last_state, .. } = &mut self.nodes[id.index()].kind {
                *last_state = cached;
            }
        }
    }

    /// Edge-pass evaluation. Only the root flip-flop samples its input;
    /// every other flip-flop answers with its pre-commit state. RAM taps
    /// perform the write (when load is high) before reading back.
    fn eval_edge(&mut self, id: NodeId, root: bool) -> bool {
        let node = &self.nodes[id.index()];
        if node.visited {
            if let NodeKind::Dff { last_state, .. } = node.kind {
                return last_state;
            }
            return node.cached;
        }
        let kind = node.kind;
        self.nodes[id.index()].visited = true;

        let value = match kind {
            NodeKind::Constant { value } => value,
            NodeKind::Nand { a, b } => {
                let left = self.eval_edge(a, false);
                let right = self.eval_edge(b, false);
                !(left && right)
            }
            NodeKind::Dff { input, .. } => {
                if !root {
                    return self.nodes[id.index()].cached;
                }
                self.eval_edge(input, false)
            }
            NodeKind::RamOut { ram, bit } => {
                let block = &self.rams[ram.index()];
                let (inputs, load_id, addrs) = (block.inputs, block.load, block.addrs);

                let load = self.eval_edge(load_id, false);
                let data = self.eval_word_edge(&inputs);
                let addr = self.eval_word_edge(&addrs);

                if load {
                    self.ram_write(ram, addr, data);
                }
                let word = self.ram_read(ram, addr);
                self.latch_ram_outputs(ram, word);
                (word >> bit) & 1 == 1
            }
        };

        self.nodes[id.index()].cached = value;
        value
    }

    fn eval_word_edge(&mut self, bits: &[NodeId; 16]) -> u16 {
        let mut word = 0u16;
        for (i, &bit) in bits.iter().enumerate() {
            if self.eval_edge(bit, false) {
                word |= 1 << i;
            }
        }
        word
    }

    // ========================================================================
    // RAM access
    // ========================================================================

    /// Reads the 16-bit word at byte address `addr`, little-endian. The high
    /// byte wraps at the top of the address space.
    fn ram_read(&self, ram: RamId, addr: u16) -> u16 {
        let data = &self.rams[ram.index()].data;
        let lo = data[addr as usize];
        let hi = data[(addr as usize + 1) % RAM_BYTES];
        u16::from_le_bytes([lo, hi])
    }

    /// Writes a 16-bit word at byte address `addr`, little-endian.
    fn ram_write(&mut self, ram: RamId, addr: u16, word: u16) {
        let data = &mut self.rams[ram.index()].data;
        let [lo, hi] = word.to_le_bytes();
        data[addr as usize] = lo;
        data[(addr as usize + 1) % RAM_BYTES] = hi;
    }

    /// Latches a freshly read word into all 16 output taps of a RAM block,
    /// marking them visited for the rest of the pass.
    fn latch_ram_outputs(&mut self, ram: RamId, word: u16) {
        let outputs = self.rams[ram.index()].outputs;
        for (i, out) in outputs.into_iter().enumerate() {
            let node = &mut self.nodes[out.index()];
            node.visited = true;
            node.cached = (word >> i) & 1 == 1;
        }
    }
}
