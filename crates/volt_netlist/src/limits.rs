//! Static per-module and per-compilation capacity limits.
//!
//! Exceeding any of these is a capacity error reported by the compiler.

/// Maximum number of parts in one module.
pub const MAX_PARTS: usize = 64;

/// Maximum number of named plus anonymous wires in one module.
pub const MAX_WIRES: usize = 32;

/// Maximum number of input bits (sum of parameter widths) in one module.
pub const MAX_INPUT_BITS: usize = 160;

/// Maximum number of output bits in one module.
pub const MAX_OUTPUT_BITS: usize = 128;

/// Maximum number of registry entries per compilation, built-ins included.
pub const MAX_MODULES: usize = 64;
