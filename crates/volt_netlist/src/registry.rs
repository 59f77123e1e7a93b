//! Insertion-ordered registry of module descriptors.

use volt_common::{Ident, NameTable};

use crate::descriptor::ModuleDesc;
use crate::ids::DescId;

/// Insertion-ordered registry of module descriptors, seeded with the three
/// built-in primitives.
///
/// Lookup is a linear scan returning the first match; module counts are
/// small (dozens) by design, and insertion order is what defines lookup
/// priority.
pub struct ModuleRegistry {
    descs: Vec<ModuleDesc>,
}

impl ModuleRegistry {
    /// Creates a registry seeded with the `Nand`, `Dff`, and `Ram64K`
    /// built-ins, in that order.
    pub fn with_builtins(interner: &NameTable) -> Self {
        let descs = vec![
            ModuleDesc::nand(interner.intern("Nand")),
            ModuleDesc::dff(interner.intern("Dff")),
            ModuleDesc::ram64k(interner.intern("Ram64K")),
        ];
        Self { descs }
    }

    /// Appends a descriptor, returning its ID.
    pub fn insert(&mut self, desc: ModuleDesc) -> DescId {
        let id = DescId::from_raw(self.descs.len() as u32);
        self.descs.push(desc);
        id
    }

    /// Finds the first descriptor with the given name.
    pub fn lookup(&self, name: Ident) -> Option<DescId> {
        self.descs
            .iter()
            .position(|d| d.name == name)
            .map(|i| DescId::from_raw(i as u32))
    }

    /// Returns the descriptor with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: DescId) -> &ModuleDesc {
        &self.descs[id.as_raw() as usize]
    }

    /// The number of registered descriptors, built-ins included.
    pub fn len(&self) -> usize {
        self.descs.len()
    }

    /// Returns `true` if the registry holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }

    /// Drops all descriptors registered after the first `len`, restoring the
    /// registry to an earlier state. Used to roll back a failed compilation.
    pub fn truncate(&mut self, len: usize) {
        self.descs.truncate(len);
    }

    /// Iterates over `(DescId, &ModuleDesc)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DescId, &ModuleDesc)> {
        self.descs
            .iter()
            .enumerate()
            .map(|(i, d)| (DescId::from_raw(i as u32), d))
    }
}
