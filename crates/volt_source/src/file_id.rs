//! Handles to source text registered with a compilation session.

use serde::{Deserialize, Serialize};

/// Handle to one piece of registered source text.
///
/// Real handles are allocated by the [`SourceDb`](crate::SourceDb) starting
/// at 1; the reserved [`UNKNOWN`](FileId::UNKNOWN) handle is zero and marks
/// spans that have no source location, such as diagnostics about the
/// session as a whole.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// The reserved handle for "no source location".
    pub const UNKNOWN: FileId = FileId(0);

    /// Reconstructs a handle from its raw value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value of this handle.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for the reserved [`UNKNOWN`](FileId::UNKNOWN) handle.
    pub fn is_unknown(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_zero_and_flagged() {
        assert_eq!(FileId::UNKNOWN.as_raw(), 0);
        assert!(FileId::UNKNOWN.is_unknown());
        assert!(!FileId::from_raw(1).is_unknown());
    }

    #[test]
    fn raw_roundtrip() {
        let id = FileId::from_raw(7);
        assert_eq!(id.as_raw(), 7);
        assert_eq!(FileId::from_raw(id.as_raw()), id);
    }

    #[test]
    fn serde_roundtrip() {
        let id = FileId::from_raw(3);
        let json = serde_json::to_string(&id).unwrap();
        let back: FileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
