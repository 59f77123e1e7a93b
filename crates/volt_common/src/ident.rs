//! Interned names for modules, ports, nets, and part labels.
//!
//! Every name the compiler sees lives in one [`NameTable`] for the lifetime
//! of a compilation session: module names, port and net names, part labels,
//! and the `_N_` names minted for anonymous wires. Descriptors and symbol
//! entries then carry copyable [`Ident`] handles instead of short strings,
//! and name resolution during width inference and lowering is an integer
//! compare.

use lasso::{Key, Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};

/// The interned name of a module, port, net, or part label.
///
/// Two `Ident`s from the same [`NameTable`] are equal exactly when they
/// spell the same name. Names are case-sensitive: `Nand` and `nand` are
/// different identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(Spur);

impl Ident {
    /// Reconstructs an `Ident` from a raw index, for deserialized
    /// descriptors and tests. Live identifiers come from
    /// [`NameTable::intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(Spur::try_from_usize(index as usize).expect("identifier index out of range"))
    }

    /// The raw index of this identifier.
    pub fn as_raw(self) -> u32 {
        self.0.into_usize() as u32
    }
}

/// The session-wide name table.
pub struct NameTable {
    names: ThreadedRodeo,
}

impl NameTable {
    /// Creates an empty name table.
    pub fn new() -> Self {
        Self {
            names: ThreadedRodeo::new(),
        }
    }

    /// Interns `name`, returning its handle. Interning the same spelling
    /// twice returns the same handle without allocating.
    pub fn intern(&self, name: &str) -> Ident {
        Ident(self.names.get_or_intern(name))
    }

    /// Looks a name up without interning it. Returns `None` if no part of
    /// the session has mentioned the name, which is how lookups for
    /// never-declared modules avoid growing the table.
    pub fn get(&self, name: &str) -> Option<Ident> {
        self.names.get(name).map(Ident)
    }

    /// Resolves a handle back to its spelling.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this table.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.names.resolve(&ident.0)
    }

    /// Mints the name of the `n`-th anonymous wire, spelled `_n_`.
    ///
    /// Anonymous wires are introduced when a concatenation brace appears as
    /// a part argument or nested inside another wire. The spelling can
    /// collide with a user-written `_n_` net; resolution order makes the
    /// user's net win, matching how explicit nets shadow generated ones.
    pub fn anonymous_wire(&self, n: u32) -> Ident {
        self.intern(&format!("_{n}_"))
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_resolve_roundtrip() {
        let names = NameTable::new();
        let id = names.intern("Ram64K");
        assert_eq!(names.resolve(id), "Ram64K");
    }

    #[test]
    fn same_spelling_same_handle() {
        let names = NameTable::new();
        // The net `sum` mentioned as a part result and again as an argument
        // must resolve to one identifier.
        let declared = names.intern("sum");
        let referenced = names.intern("sum");
        assert_eq!(declared, referenced);
    }

    #[test]
    fn names_are_case_sensitive() {
        let names = NameTable::new();
        assert_ne!(names.intern("Nand"), names.intern("nand"));
    }

    #[test]
    fn get_does_not_intern() {
        let names = NameTable::new();
        assert!(names.get("Missing").is_none());
        let id = names.intern("Missing");
        assert_eq!(names.get("Missing"), Some(id));
    }

    #[test]
    fn anonymous_wire_spelling() {
        let names = NameTable::new();
        let first = names.anonymous_wire(1);
        assert_eq!(names.resolve(first), "_1_");
        // A user-written `_1_` is the same identifier; resolution order
        // decides which net it names.
        assert_eq!(names.intern("_1_"), first);
        assert_ne!(names.anonymous_wire(2), first);
    }

    #[test]
    fn raw_roundtrip() {
        let names = NameTable::new();
        let id = names.intern("cir");
        assert_eq!(Ident::from_raw(id.as_raw()), id);
    }

    #[test]
    fn serde_roundtrip() {
        let names = NameTable::new();
        let id = names.intern("acc");
        let json = serde_json::to_string(&id).unwrap();
        let back: Ident = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
