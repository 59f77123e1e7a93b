//! Opaque ID newtypes for netlist entities.

use serde::{Deserialize, Serialize};

/// Opaque, copyable ID for a module descriptor in the registry.
///
/// IDs index into the registry's insertion-ordered descriptor list; they are
/// stable for the lifetime of the registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DescId(u32);

impl DescId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}
