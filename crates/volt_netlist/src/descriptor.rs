//! Module descriptors: the post-compilation representation of one module.

use serde::{Deserialize, Serialize};
use volt_common::Ident;

use crate::ids::DescId;

/// One of the three built-in primitive elements the simulator evaluates
/// directly.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Primitive {
    /// Two-input NAND gate: `Nand(a, b) -> out`.
    Nand,
    /// D-type flip-flop: `Dff(in) -> out`.
    Dff,
    /// 64K-byte RAM with 16-bit word access:
    /// `Ram64K(in[16], load, addr[16]) -> out[16]`.
    Ram64k,
}

/// One part (submodule instantiation) inside a module.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Part {
    /// The descriptor of the instantiated module.
    pub desc: DescId,
    /// The optional user-given label, the handle for submodule state
    /// inspection.
    pub label: Option<Ident>,
}

/// One entry in a part's connection list, describing where one input bit of
/// the part comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Connection {
    /// The bit comes from the enclosing module's input, at the given absolute
    /// input bit offset.
    External {
        /// Absolute bit offset into the enclosing module's flattened inputs.
        bit: u32,
    },
    /// The bit comes from a sibling part's output.
    Internal {
        /// Index of the producing part within the enclosing module.
        part: u32,
        /// Absolute bit offset into the producing part's flattened outputs.
        bit: u32,
    },
    /// The bit is a constant 0 or 1.
    Constant {
        /// The constant value.
        value: bool,
    },
}

/// The producer of one module output bit.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OutputSource {
    /// The bit is produced by a part's output.
    Part {
        /// Index of the producing part.
        part: u32,
        /// Absolute bit offset into the producing part's flattened outputs.
        bit: u32,
    },
    /// The bit is a constant 0 or 1.
    Constant {
        /// The constant value.
        value: bool,
    },
}

/// The post-compilation representation of one module.
///
/// Invariants established by the compiler:
/// - `part_connections[p].len()` equals the input bit count of part `p`'s
///   descriptor, one entry per input bit, in argument order.
/// - `outputs.len()` equals the module's output bit count and every entry is
///   a concrete producer (primitives carry an empty list; the simulator
///   handles their outputs directly).
/// - `sink_counts[i]` is the number of primitive input slots fed by input
///   bit `i` across the whole expanded subtree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModuleDesc {
    /// The module name.
    pub name: Ident,
    /// `Some` for the three built-ins, `None` for compiled modules.
    pub primitive: Option<Primitive>,
    /// The parts, in declaration order.
    pub parts: Vec<Part>,
    /// Per-part connection lists, parallel to `parts`.
    pub part_connections: Vec<Vec<Connection>>,
    /// Bit width of each input parameter.
    pub input_widths: Vec<u32>,
    /// Bit width of each output parameter.
    pub output_widths: Vec<u32>,
    /// The producer of every output bit.
    pub outputs: Vec<OutputSource>,
    /// Per input bit: number of primitive input slots it ultimately feeds.
    pub sink_counts: Vec<u32>,
    /// Total primitive nodes in the expanded subtree, for arena pre-sizing.
    pub node_count: u32,
    /// Total sequential nodes (flip-flops and RAM output nodes) in the
    /// expanded subtree.
    pub dff_count: u32,
}

impl ModuleDesc {
    /// The number of input parameters.
    pub fn input_param_count(&self) -> usize {
        self.input_widths.len()
    }

    /// The number of output parameters.
    pub fn output_param_count(&self) -> usize {
        self.output_widths.len()
    }

    /// The total number of input bits (sum of parameter widths).
    pub fn input_count(&self) -> u32 {
        self.input_widths.iter().sum()
    }

    /// The total number of output bits (sum of parameter widths).
    pub fn output_count(&self) -> u32 {
        self.output_widths.iter().sum()
    }

    /// The absolute bit offset of input parameter `param` within the
    /// flattened inputs.
    pub fn input_bit_offset(&self, param: usize) -> u32 {
        self.input_widths[..param].iter().sum()
    }

    /// The absolute bit offset of output parameter `param` within the
    /// flattened outputs.
    pub fn output_bit_offset(&self, param: usize) -> u32 {
        self.output_widths[..param].iter().sum()
    }

    /// Returns `true` if this descriptor is the NAND primitive.
    pub fn is_nand(&self) -> bool {
        self.primitive == Some(Primitive::Nand)
    }

    /// Returns `true` if this descriptor is the flip-flop primitive.
    pub fn is_dff(&self) -> bool {
        self.primitive == Some(Primitive::Dff)
    }

    /// Returns `true` if this descriptor is the RAM primitive.
    pub fn is_ram64k(&self) -> bool {
        self.primitive == Some(Primitive::Ram64k)
    }

    /// Builds the NAND primitive descriptor: two 1-bit inputs, one output.
    pub fn nand(name: Ident) -> Self {
        Self {
            name,
            primitive: Some(Primitive::Nand),
            parts: Vec::new(),
            part_connections: Vec::new(),
            input_widths: vec![1, 1],
            output_widths: vec![1],
            outputs: Vec::new(),
            sink_counts: vec![1, 1],
            node_count: 1,
            dff_count: 0,
        }
    }

    /// Builds the flip-flop primitive descriptor: one 1-bit input, one output.
    pub fn dff(name: Ident) -> Self {
        Self {
            name,
            primitive: Some(Primitive::Dff),
            parts: Vec::new(),
            part_connections: Vec::new(),
            input_widths: vec![1],
            output_widths: vec![1],
            outputs: Vec::new(),
            sink_counts: vec![1],
            node_count: 1,
            dff_count: 1,
        }
    }

    /// Builds the RAM primitive descriptor.
    ///
    /// Inputs are `in[16]`, `load`, `addr[16]` (33 bits); the output is the
    /// 16-bit word at the current address. The 16 RAM output nodes are
    /// sequential (they participate in the rising-edge pass), so they count
    /// toward `dff_count`.
    pub fn ram64k(name: Ident) -> Self {
        Self {
            name,
            primitive: Some(Primitive::Ram64k),
            parts: Vec::new(),
            part_connections: Vec::new(),
            input_widths: vec![16, 1, 16],
            output_widths: vec![16],
            outputs: Vec::new(),
            sink_counts: vec![1; 33],
            node_count: 16,
            dff_count: 16,
        }
    }
}
